//! Menu Item API Module
//!
//! 菜单浏览对所有登录用户开放，增删改和库存调整仅限管理员。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu-items", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/stock", post(handler::adjust_stock))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
