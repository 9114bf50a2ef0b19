//! Staff attendance
//!
//! Check-in and check-out records with GPS position and a selfie. The
//! selfie is uploaded to the media host BEFORE the record is written;
//! an upload failure means no attendance record at all, so a record
//! with a dangling photo URL can never exist.

use std::sync::Arc;

use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::info;

use crate::db::models::{
    CheckDirection, CheckInCreate, CheckInRecord, NotificationKind,
};
use crate::db::repository::{CheckInRepository, UserRepository};
use crate::media::{MediaUploader, folders};
use crate::notify::NotifyService;
use crate::sync::{SyncBroadcaster, resources};
use crate::utils::{AppResult, time};

/// Selfie payload taken from the multipart request
#[derive(Debug)]
pub struct CheckInPhoto {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Position and direction for one attendance event
#[derive(Debug, Clone)]
pub struct CheckInInput {
    pub latitude: f64,
    pub longitude: f64,
    pub direction: CheckDirection,
    pub address: Option<String>,
}

#[derive(Clone)]
pub struct CheckInService {
    repo: CheckInRepository,
    users: UserRepository,
    media: Arc<MediaUploader>,
    notify: NotifyService,
    sync: Arc<SyncBroadcaster>,
    tz: Tz,
}

impl CheckInService {
    pub fn new(
        db: Surreal<Db>,
        media: Arc<MediaUploader>,
        notify: NotifyService,
        sync: Arc<SyncBroadcaster>,
        tz: Tz,
    ) -> Self {
        Self {
            repo: CheckInRepository::new(db.clone()),
            users: UserRepository::new(db),
            media,
            notify,
            sync,
            tz,
        }
    }

    /// Record one attendance event, uploading the selfie first
    pub async fn record(
        &self,
        staff_id: &str,
        staff_name: &str,
        input: CheckInInput,
        photo: Option<CheckInPhoto>,
    ) -> AppResult<CheckInRecord> {
        let photo_url = match photo {
            Some(photo) => {
                let uploaded = self
                    .media
                    .upload(
                        photo.data,
                        &photo.filename,
                        &photo.content_type,
                        folders::UPLOADS,
                    )
                    .await?;
                Some(uploaded.secure_url)
            }
            None => None,
        };

        let record = self
            .repo
            .create(CheckInCreate {
                staff_id: staff_id.to_string(),
                timestamp: shared::util::now_millis(),
                latitude: input.latitude,
                longitude: input.longitude,
                direction: input.direction,
                photo_url,
                address: input.address,
            })
            .await?;

        info!(
            staff = %staff_id,
            direction = ?record.direction,
            "attendance recorded"
        );

        self.sync.publish(
            resources::CHECK_IN,
            "created",
            &record.id_string(),
            Some(&record),
        );
        self.notify_admins(staff_name, record.direction).await;

        Ok(record)
    }

    /// Whether the staff member has any attendance record today
    /// (business timezone calendar day). Display-only: an "out"
    /// record counts the same as an "in".
    pub async fn checked_in_today(&self, staff_id: &str) -> AppResult<bool> {
        let today = time::today(self.tz);
        let start = time::day_start_millis(today, self.tz);
        let end = time::day_start_millis(today.succ_opt().unwrap_or(today), self.tz);

        let records = self.repo.find_by_staff_in_range(staff_id, start, end).await?;
        Ok(!records.is_empty())
    }

    async fn notify_admins(&self, staff_name: &str, direction: CheckDirection) {
        let admins = match self.users.find_admins().await {
            Ok(admins) => admins,
            Err(_) => return,
        };
        let verb = match direction {
            CheckDirection::In => "đã chấm công vào ca",
            CheckDirection::Out => "đã chấm công tan ca",
        };
        let message = format!("{staff_name} {verb}");
        for admin in &admins {
            self.notify
                .send(admin.id_string(), message.clone(), NotificationKind::System);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use chrono_tz::Asia::Ho_Chi_Minh;

    async fn service() -> CheckInService {
        let db = DbService::in_memory().await.unwrap().db;
        let media = Arc::new(MediaUploader::new(
            "http://localhost:1/upload".to_string(),
            "test".to_string(),
        ));
        let (notify, _rx) = NotifyService::with_capacity(8);
        let sync = Arc::new(SyncBroadcaster::default());
        CheckInService::new(db, media, notify, sync, Ho_Chi_Minh)
    }

    fn position() -> CheckInInput {
        CheckInInput {
            latitude: 10.776,
            longitude: 106.7,
            direction: CheckDirection::In,
            address: Some("Quận 1".to_string()),
        }
    }

    #[tokio::test]
    async fn record_without_photo_is_stored() {
        let service = service().await;

        let record = service
            .record("user:a", "Linh", position(), None)
            .await
            .unwrap();
        assert_eq!(record.staff_id, "user:a");
        assert_eq!(record.direction, CheckDirection::In);
        assert!(record.photo_url.is_none());
        assert!(record.id_string().starts_with("check_in:"));
    }

    #[tokio::test]
    async fn failed_photo_upload_creates_no_record() {
        // Port 1 is unreachable, the upload must fail
        let service = service().await;

        let photo = CheckInPhoto {
            data: vec![0xFF, 0xD8, 0xFF],
            filename: "selfie.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        };
        assert!(service
            .record("user:a", "Linh", position(), Some(photo))
            .await
            .is_err());

        let records = service.repo.find_by_staff("user:a").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn checked_in_today_counts_any_direction() {
        let service = service().await;
        assert!(!service.checked_in_today("user:a").await.unwrap());
        assert!(!service.checked_in_today("user:b").await.unwrap());

        // An "out" event still marks the day as attended
        let mut out = position();
        out.direction = CheckDirection::Out;
        service.record("user:a", "Linh", out, None).await.unwrap();
        assert!(service.checked_in_today("user:a").await.unwrap());

        service
            .record("user:b", "Mai", position(), None)
            .await
            .unwrap();
        assert!(service.checked_in_today("user:b").await.unwrap());
    }
}
