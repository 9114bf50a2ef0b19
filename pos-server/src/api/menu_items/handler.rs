//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::sync::resources;
use crate::utils::{AppError, AppResult};

/// List the full menu
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// Get one menu item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    Ok(Json(item))
}

/// Create a menu item
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    if payload.price < 0 || payload.stock < 0 {
        return Err(AppError::validation("Price and stock must be non-negative"));
    }

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(payload).await?;

    state.broadcast_sync(resources::MENU_ITEM, "created", &item.id_string(), Some(&item));
    Ok(Json(item))
}

/// Update a menu item
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if payload.price.is_some_and(|p| p < 0) || payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("Price and stock must be non-negative"));
    }

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.update(&id, payload).await?;

    state.broadcast_sync(resources::MENU_ITEM, "updated", &id, Some(&item));
    Ok(Json(item))
}

/// Delete a menu item
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state.broadcast_sync::<()>(resources::MENU_ITEM, "deleted", &id, None);
    }
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    /// Signed delta; the result is floored at zero
    pub delta: i64,
}

/// Manual stock adjustment (restock or shrink correction)
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.adjust_stock(&id, payload.delta).await?;

    state.broadcast_sync(resources::MENU_ITEM, "updated", &id, Some(&item));
    Ok(Json(item))
}
