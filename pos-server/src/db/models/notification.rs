//! Notification Model
//!
//! Append-only, fanned out to admins or the acting staff member on
//! order and check-in events. Delivery is best-effort — failures are
//! logged and never retried.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Shift,
    System,
    Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Target user record id ("user:xxx")
    pub user_id: String,
    pub message: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    pub timestamp: i64,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub user_id: String,
    pub message: String,
    pub timestamp: i64,
    pub kind: NotificationKind,
}
