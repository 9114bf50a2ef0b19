//! Statistics API Module
//!
//! 营收统计，仅限管理员。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/summary", get(handler::summary))
        .route("/items", get(handler::items))
        .route("/staff", get(handler::staff))
        .layer(middleware::from_fn(require_admin))
}
