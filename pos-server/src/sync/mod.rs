//! Real-time sync broadcasting
//!
//! Every store mutation publishes a [`SyncPayload`] so connected POS
//! terminals can refresh the affected resource without polling. Delivery
//! is best-effort over a tokio broadcast channel; a terminal that falls
//! behind misses messages and recovers on its next full fetch.

use dashmap::DashMap;
use serde::Serialize;
use shared::sync::SyncPayload;
use tokio::sync::broadcast;
use tracing::debug;

/// Resource name constants used as `SyncPayload.resource`
pub mod resources {
    pub const USER: &str = "user";
    pub const MENU_ITEM: &str = "menu_item";
    pub const ORDER: &str = "order";
    pub const SHIFT: &str = "shift";
    pub const CHECK_IN: &str = "check_in";
    pub const NOTIFICATION: &str = "notification";
}

/// Lock-free per-resource version counters
///
/// Each resource type carries an independent monotonically increasing
/// version so clients can tell stale payloads from fresh ones.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version for a resource and return the new value.
    /// Unknown resources start at 0 and return 1.
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version, 0 for a resource never published
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Broadcast fan-out for sync payloads
///
/// Wraps a `tokio::sync::broadcast` channel. Send never blocks; when no
/// terminal is subscribed the payload is simply dropped.
#[derive(Debug, Clone)]
pub struct SyncBroadcaster {
    tx: broadcast::Sender<SyncPayload>,
    versions: std::sync::Arc<ResourceVersions>,
}

impl SyncBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: std::sync::Arc::new(ResourceVersions::new()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncPayload> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn versions(&self) -> &ResourceVersions {
        &self.versions
    }

    /// Publish a resource change to all subscribers
    ///
    /// | Param | Meaning |
    /// |-------|---------|
    /// | `resource` | resource type ("user", "menu_item", "order", ...) |
    /// | `action` | "created", "updated" or "deleted" |
    /// | `id` | record id of the changed document |
    /// | `data` | full document, `None` for deletions |
    pub fn publish<T: Serialize>(&self, resource: &str, action: &str, id: &str, data: Option<&T>) {
        let version = self.versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        match self.tx.send(payload) {
            Ok(n) => debug!("sync {resource}/{action} v{version} -> {n} subscribers"),
            Err(_) => debug!("sync {resource}/{action} v{version} -> no subscribers"),
        }
    }
}

impl Default for SyncBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.get("user"), 0);
        assert_eq!(versions.increment("user"), 1);
        assert_eq!(versions.increment("user"), 2);
        assert_eq!(versions.increment("order"), 1);
        assert_eq!(versions.get("user"), 2);
    }

    #[tokio::test]
    async fn publish_reaches_subscriber_with_incrementing_version() {
        let broadcaster = SyncBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();

        broadcaster.publish(resources::MENU_ITEM, "updated", "menu_item:x", Some(&42));
        broadcaster.publish::<()>(resources::MENU_ITEM, "deleted", "menu_item:x", None);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.resource, "menu_item");
        assert_eq!(first.version, 1);
        assert_eq!(first.data, Some(serde_json::json!(42)));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.action, "deleted");
        assert_eq!(second.version, 2);
        assert!(second.data.is_none());
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let broadcaster = SyncBroadcaster::default();
        broadcaster.publish(resources::ORDER, "created", "order:1", Some(&"x"));
        assert_eq!(broadcaster.versions().get("order"), 1);
    }
}
