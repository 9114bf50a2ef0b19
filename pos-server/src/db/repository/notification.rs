//! Notification Repository — append + mark-read only

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Notification, NotificationCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append a notification
    pub async fn create(&self, data: NotificationCreate) -> RepoResult<Notification> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE notification SET
                    user_id = $user_id,
                    message = $message,
                    is_read = false,
                    timestamp = $timestamp,
                    kind = $kind
                RETURN AFTER"#,
            )
            .bind(("user_id", data.user_id))
            .bind(("message", data.message))
            .bind(("timestamp", data.timestamp))
            .bind(("kind", data.kind))
            .await?;

        let created: Option<Notification> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    /// All notifications for one user, newest first
    pub async fn find_for_user(&self, user_id: &str) -> RepoResult<Vec<Notification>> {
        let user_owned = user_id.to_string();
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query("SELECT * FROM notification WHERE user_id = $user_id ORDER BY timestamp DESC")
            .bind(("user_id", user_owned))
            .await?
            .take(0)?;
        Ok(notifications)
    }

    /// Mark one notification read
    pub async fn mark_read(&self, id: &str) -> RepoResult<Notification> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_read = true RETURN AFTER")
            .bind(("thing", thing))
            .await?;

        result
            .take::<Option<Notification>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Notification {} not found", id)))
    }
}
