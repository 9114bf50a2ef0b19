//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = self.base.parse_id(id)?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.price < 0 || data.stock < 0 {
            return Err(RepoError::Validation(
                "Price and stock must be non-negative".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE menu_item SET
                    name = $name,
                    price = $price,
                    category = $category,
                    stock = $stock,
                    media_url = $media_url
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("price", data.price))
            .bind(("category", data.category))
            .bind(("stock", data.stock))
            .bind(("media_url", data.media_url))
            .await?;

        let created: Option<MenuItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item (field-level merge)
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        if data.price.is_some_and(|p| p < 0) || data.stock.is_some_and(|s| s < 0) {
            return Err(RepoError::Validation(
                "Price and stock must be non-negative".to_string(),
            ));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    price = IF $has_price THEN $price ELSE price END,
                    category = IF $has_category THEN $category ELSE category END,
                    stock = IF $has_stock THEN $stock ELSE stock END,
                    media_url = $media_url OR media_url
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("has_price", data.price.is_some()))
            .bind(("price", data.price))
            .bind(("has_category", data.category.is_some()))
            .bind(("category", data.category))
            .bind(("has_stock", data.stock.is_some()))
            .bind(("stock", data.stock))
            .bind(("media_url", data.media_url))
            .await?;

        result
            .take::<Option<MenuItem>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Adjust stock by a signed delta, clamped at zero (admin ±1 buttons)
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> RepoResult<MenuItem> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET stock = math::max([stock + $delta, 0]) RETURN AFTER")
            .bind(("thing", thing))
            .bind(("delta", delta))
            .await?;

        result
            .take::<Option<MenuItem>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Decrement stock by a purchased quantity, floored at zero
    ///
    /// No lock is taken between the cart's read-time stock check and this
    /// write; two concurrent checkouts may both pass the check. The floor
    /// keeps the counter non-negative; oversell is possible and accepted.
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> RepoResult<MenuItem> {
        self.adjust_stock(id, -quantity.max(0)).await
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
