//! Check-in Record Model
//!
//! Append-only attendance events. Nothing prevents duplicate or
//! out-of-order in/out events — "checked in today" is a display-only
//! derivation, not an attendance-integrity guarantee.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckDirection {
    In,
    Out,
}

impl CheckDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Geolocated attendance event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Staff record id ("user:xxx")
    pub staff_id: String,
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub direction: CheckDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CheckInRecord {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Create check-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInCreate {
    pub staff_id: String,
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub direction: CheckDirection,
    pub photo_url: Option<String>,
    pub address: Option<String>,
}
