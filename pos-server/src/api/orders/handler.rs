//! Order API Handlers
//!
//! The cart endpoints operate on the caller's own cart only; the staff
//! id comes from the JWT, never from the request body.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::cart::CartLine;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::{MenuItemRepository, OrderRepository};
use crate::orders::CheckoutRequest;
use crate::utils::{AppError, AppResult};

/// Cart contents as returned to the terminal
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: i64,
}

fn cart_view(state: &ServerState, staff_id: &str) -> CartView {
    state.carts.with_cart(staff_id, |cart| CartView {
        lines: cart.lines().to_vec(),
        total: cart.total(),
    })
}

/// Current cart
pub async fn get_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    Ok(Json(cart_view(&state, &user.id)))
}

/// Empty the cart
pub async fn clear_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CartView>> {
    state.carts.with_cart(&user.id, |cart| cart.clear());
    Ok(Json(cart_view(&state, &user.id)))
}

#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub item_id: String,
}

/// Add one unit of a menu item to the cart
pub async fn add_to_cart(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddToCart>,
) -> AppResult<Json<CartView>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&payload.item_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", payload.item_id)))?;

    state
        .carts
        .with_cart(&user.id, |cart| cart.add_item(&item))
        .map_err(|e| AppError::business_rule(e.to_string()))?;

    Ok(Json(cart_view(&state, &user.id)))
}

#[derive(Debug, Deserialize)]
pub struct QuantityChange {
    /// Signed delta; the resulting quantity is clamped to [0, stock]
    /// and the line is removed at zero
    pub delta: i64,
}

/// Adjust the quantity of one cart line
pub async fn set_quantity(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<String>,
    Json(payload): Json<QuantityChange>,
) -> AppResult<Json<CartView>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&item_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", item_id)))?;

    state.carts.with_cart(&user.id, |cart| {
        cart.set_quantity(&item_id, payload.delta, item.stock)
    });

    Ok(Json(cart_view(&state, &user.id)))
}

/// Checkout the caller's cart into a completed order
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .checkout
        .checkout(&user.id, &user.name, payload)
        .await?;
    Ok(Json(order))
}

/// Order history — admins see everything, staff see their own orders
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = if user.is_admin() {
        repo.find_all().await?
    } else {
        repo.find_by_staff(&user.id).await?
    };
    Ok(Json(orders))
}

/// One order; staff can only read their own
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !user.is_admin() && order.staff_id != user.id {
        return Err(AppError::forbidden("Not your order"));
    }
    Ok(Json(order))
}
