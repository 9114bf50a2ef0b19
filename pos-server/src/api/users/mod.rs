//! User API Module
//!
//! 账号管理。读取对所有登录用户开放，管理操作仅限管理员。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：员工也需要看到同事列表 (排班显示名字)
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // 管理路由：仅管理员可用
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/lock", post(handler::lock))
        .route("/{id}/unlock", post(handler::unlock))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
