//! Check-in Repository — append-only

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{CheckInCreate, CheckInRecord};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CheckInRepository {
    base: BaseRepository,
}

impl CheckInRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append a check-in/out event
    pub async fn create(&self, data: CheckInCreate) -> RepoResult<CheckInRecord> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE check_in SET
                    staff_id = $staff_id,
                    timestamp = $timestamp,
                    latitude = $latitude,
                    longitude = $longitude,
                    direction = $direction,
                    photo_url = $photo_url,
                    address = $address
                RETURN AFTER"#,
            )
            .bind(("staff_id", data.staff_id))
            .bind(("timestamp", data.timestamp))
            .bind(("latitude", data.latitude))
            .bind(("longitude", data.longitude))
            .bind(("direction", data.direction))
            .bind(("photo_url", data.photo_url))
            .bind(("address", data.address))
            .await?;

        let created: Option<CheckInRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create check-in".to_string()))
    }

    /// All events for one staff member, newest first
    pub async fn find_by_staff(&self, staff_id: &str) -> RepoResult<Vec<CheckInRecord>> {
        let staff_owned = staff_id.to_string();
        let records: Vec<CheckInRecord> = self
            .base
            .db()
            .query("SELECT * FROM check_in WHERE staff_id = $staff_id ORDER BY timestamp DESC")
            .bind(("staff_id", staff_owned))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// All events (admin attendance view), newest first
    pub async fn find_all(&self) -> RepoResult<Vec<CheckInRecord>> {
        let records: Vec<CheckInRecord> = self
            .base
            .db()
            .query("SELECT * FROM check_in ORDER BY timestamp DESC")
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Events for one staff member in a timestamp range [start, end)
    pub async fn find_by_staff_in_range(
        &self,
        staff_id: &str,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<CheckInRecord>> {
        let staff_owned = staff_id.to_string();
        let records: Vec<CheckInRecord> = self
            .base
            .db()
            .query(
                "SELECT * FROM check_in \
                 WHERE staff_id = $staff_id AND timestamp >= $start AND timestamp < $end \
                 ORDER BY timestamp",
            )
            .bind(("staff_id", staff_owned))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(records)
    }
}
