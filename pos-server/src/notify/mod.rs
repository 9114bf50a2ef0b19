//! Notification fan-out
//!
//! Order and check-in events enqueue notification writes through an
//! mpsc channel consumed by a background worker. Enqueue never blocks a
//! request handler: a full queue drops the notification with a warning.
//! Notifications are a convenience surface, never part of the primary
//! transaction.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::db::models::{NotificationCreate, NotificationKind};
use crate::db::repository::NotificationRepository;
use crate::sync::{SyncBroadcaster, resources};

const DEFAULT_QUEUE_SIZE: usize = 256;

/// One queued notification write
#[derive(Debug)]
pub struct NotifyRequest {
    pub user_id: String,
    pub message: String,
    pub kind: NotificationKind,
}

/// Non-blocking enqueue handle, cheap to clone
#[derive(Clone, Debug)]
pub struct NotifyService {
    tx: mpsc::Sender<NotifyRequest>,
}

impl NotifyService {
    pub fn new() -> (Self, mpsc::Receiver<NotifyRequest>) {
        Self::with_capacity(DEFAULT_QUEUE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<NotifyRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queue one notification, best-effort
    pub fn send(&self, user_id: impl Into<String>, message: impl Into<String>, kind: NotificationKind) {
        let req = NotifyRequest {
            user_id: user_id.into(),
            message: message.into(),
            kind,
        };
        match self.tx.try_send(req) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(req)) => {
                warn!("notification queue full, dropping message for {}", req.user_id);
            }
            Err(mpsc::error::TrySendError::Closed(req)) => {
                warn!("notification worker stopped, dropping message for {}", req.user_id);
            }
        }
    }

    /// Queue the same message for several users
    pub fn send_many<'a, I>(&self, user_ids: I, message: &str, kind: NotificationKind)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for user_id in user_ids {
            self.send(user_id, message, kind);
        }
    }
}

/// Background worker consuming [`NotifyRequest`]s
///
/// Writes the notification document and publishes a sync payload so the
/// target terminal refreshes its bell badge. Exits when every sender is
/// dropped.
pub struct NotifyWorker {
    repo: NotificationRepository,
    sync: Arc<SyncBroadcaster>,
}

impl NotifyWorker {
    pub fn new(db: Surreal<Db>, sync: Arc<SyncBroadcaster>) -> Self {
        Self {
            repo: NotificationRepository::new(db),
            sync,
        }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<NotifyRequest>) {
        info!("notification worker started");

        while let Some(req) = rx.recv().await {
            let create = NotificationCreate {
                user_id: req.user_id,
                message: req.message,
                timestamp: shared::util::now_millis(),
                kind: req.kind,
            };
            match self.repo.create(create).await {
                Ok(notification) => {
                    debug!(
                        user = %notification.user_id,
                        kind = ?notification.kind,
                        "notification recorded"
                    );
                    self.sync.publish(
                        resources::NOTIFICATION,
                        "created",
                        &notification.id_string(),
                        Some(&notification),
                    );
                }
                Err(e) => {
                    error!("failed to write notification: {e:?}");
                }
            }
        }

        info!("notification channel closed, worker stopping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn worker_persists_queued_notifications() {
        let db = DbService::in_memory().await.unwrap().db;
        let sync = Arc::new(SyncBroadcaster::default());
        let mut sync_rx = sync.subscribe();

        let (service, rx) = NotifyService::with_capacity(8);
        let worker = NotifyWorker::new(db.clone(), sync.clone());
        let handle = tokio::spawn(worker.run(rx));

        service.send("user:a", "Ca lam moi da duoc xep", NotificationKind::Shift);
        drop(service);
        handle.await.unwrap();

        let repo = NotificationRepository::new(db);
        let stored = repo.find_for_user("user:a").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].message, "Ca lam moi da duoc xep");
        assert!(!stored[0].is_read);

        let payload = sync_rx.recv().await.unwrap();
        assert_eq!(payload.resource, "notification");
        assert_eq!(payload.action, "created");
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let (service, rx) = NotifyService::with_capacity(1);
        service.send("user:a", "first", NotificationKind::System);
        // Queue is full now, this one is dropped
        service.send("user:a", "second", NotificationKind::System);
        drop(service);

        let mut rx = rx;
        assert_eq!(rx.recv().await.unwrap().message, "first");
        assert!(rx.recv().await.is_none());
    }
}
