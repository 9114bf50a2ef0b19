//! Order Repository
//!
//! Orders are insert-only: there is no update or delete path. History
//! queries feed the statistics reductions.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create an order (the only write path)
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("Order has no items".to_string()));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    items = $items,
                    total = $total,
                    payment_method = $payment_method,
                    status = $status,
                    timestamp = $timestamp,
                    staff_id = $staff_id,
                    source = $source,
                    customer_name = $customer_name,
                    customer_phone = $customer_phone
                RETURN AFTER"#,
            )
            .bind(("items", data.items))
            .bind(("total", data.total))
            .bind(("payment_method", data.payment_method))
            .bind(("status", data.status))
            .bind(("timestamp", data.timestamp))
            .bind(("staff_id", data.staff_id))
            .bind(("source", data.source))
            .bind(("customer_name", data.customer_name))
            .bind(("customer_phone", data.customer_phone))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.base.parse_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY timestamp DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Completed orders only (statistics input), oldest first
    pub async fn find_completed(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = 'completed' ORDER BY timestamp")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Completed orders in a timestamp range [start, end)
    pub async fn find_completed_in_range(&self, start: i64, end: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE status = 'completed' AND timestamp >= $start AND timestamp < $end \
                 ORDER BY timestamp",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders placed by one staff member, newest first
    pub async fn find_by_staff(&self, staff_id: &str) -> RepoResult<Vec<Order>> {
        let staff_owned = staff_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE staff_id = $staff_id ORDER BY timestamp DESC")
            .bind(("staff_id", staff_owned))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
