//! Shift Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Shift, ShiftCreate, ShiftUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ShiftRepository {
    base: BaseRepository,
}

impl ShiftRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All shifts ordered by date then start time
    pub async fn find_all(&self) -> RepoResult<Vec<Shift>> {
        let shifts: Vec<Shift> = self
            .base
            .db()
            .query("SELECT * FROM shift ORDER BY date, start_time")
            .await?
            .take(0)?;
        Ok(shifts)
    }

    /// Find shift by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Shift>> {
        let thing = self.base.parse_id(id)?;
        let shift: Option<Shift> = self.base.db().select(thing).await?;
        Ok(shift)
    }

    /// Shifts scheduled for one calendar date (YYYY-MM-DD)
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Shift>> {
        let date_owned = date.to_string();
        let shifts: Vec<Shift> = self
            .base
            .db()
            .query("SELECT * FROM shift WHERE date = $date ORDER BY start_time")
            .bind(("date", date_owned))
            .await?
            .take(0)?;
        Ok(shifts)
    }

    /// Create a schedule entry
    pub async fn create(&self, data: ShiftCreate) -> RepoResult<Shift> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE shift SET
                    staff_ids = $staff_ids,
                    date = $date,
                    start_time = $start_time,
                    end_time = $end_time,
                    note = $note
                RETURN AFTER"#,
            )
            .bind(("staff_ids", data.staff_ids))
            .bind(("date", data.date))
            .bind(("start_time", data.start_time))
            .bind(("end_time", data.end_time))
            .bind(("note", data.note))
            .await?;

        let created: Option<Shift> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create shift".to_string()))
    }

    /// Update a schedule entry (field-level merge)
    pub async fn update(&self, id: &str, data: ShiftUpdate) -> RepoResult<Shift> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Shift {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    staff_ids = IF $has_staff_ids THEN $staff_ids ELSE staff_ids END,
                    date = $date OR date,
                    start_time = $start_time OR start_time,
                    end_time = $end_time OR end_time,
                    note = $note OR note
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("has_staff_ids", data.staff_ids.is_some()))
            .bind(("staff_ids", data.staff_ids))
            .bind(("date", data.date))
            .bind(("start_time", data.start_time))
            .bind(("end_time", data.end_time))
            .bind(("note", data.note))
            .await?;

        result
            .take::<Option<Shift>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Shift {} not found", id)))
    }

    /// Hard delete a schedule entry
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Shift {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
