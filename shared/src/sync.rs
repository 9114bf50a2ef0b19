//! Realtime sync payloads
//!
//! Every mutation on a store collection is published to connected
//! clients as a [`SyncPayload`]. Clients keep an id-keyed cache per
//! resource and apply these diffs instead of re-reading full lists.

use serde::{Deserialize, Serialize};

/// Resource change notification (server -> client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type (e.g. "menu_item", "order", "user")
    pub resource: String,
    /// Per-resource monotonic version; a gap tells the client its cache
    /// is stale and a full reload is needed
    pub version: u64,
    /// Change type: "created", "updated", "deleted"
    pub action: String,
    /// Resource id
    pub id: String,
    /// Resource data (None for "deleted")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SyncPayload {
    pub fn new<T: Serialize>(
        resource: &str,
        version: u64,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) -> Self {
        Self {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_payload_omits_data() {
        let payload = SyncPayload::new::<()>("menu_item", 3, "deleted", "menu_item:x", None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["version"], 3);
        assert_eq!(json["action"], "deleted");
    }
}
