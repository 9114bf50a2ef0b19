//! Database Module
//!
//! Embedded SurrealDB storage. The binary runs on RocksDB under the
//! configured work directory; tests run on the in-memory engine.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "banhmi";
const DATABASE: &str = "pos";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        Self::init(db).await
    }

    /// Open a fresh in-memory database (tests)
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open memory database: {}", e)))?;

        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB embedded)");
        Ok(Self { db })
    }
}

/// Apply the table/index definitions
///
/// Tables stay schemaless; only the login uniqueness constraints are
/// declared so duplicate usernames/phones fail at the store level too.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_timestamp ON TABLE order COLUMNS timestamp;
        DEFINE INDEX IF NOT EXISTS check_in_staff ON TABLE check_in COLUMNS staff_id;
        DEFINE INDEX IF NOT EXISTS notification_user ON TABLE notification COLUMNS user_id;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Category, MenuItemCreate};
    use crate::db::repository::MenuItemRepository;

    #[tokio::test]
    async fn on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pos.db");
        let path_str = path.to_string_lossy().to_string();

        {
            let service = DbService::new(&path_str).await.unwrap();
            let repo = MenuItemRepository::new(service.db.clone());
            repo.create(MenuItemCreate {
                name: "Bánh mì".to_string(),
                price: 20000,
                category: Category::Food,
                stock: 5,
                media_url: None,
            })
            .await
            .unwrap();
        }

        let reopened = DbService::new(&path_str).await.unwrap();
        let repo = MenuItemRepository::new(reopened.db.clone());
        let items = repo.find_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bánh mì");
    }
}
