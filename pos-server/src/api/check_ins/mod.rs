//! Check-in API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/check-ins | POST | 打卡 (multipart, 带自拍) | JWT |
//! | /api/check-ins/me | GET | 本人打卡记录 | JWT |
//! | /api/check-ins/today | GET | 今天是否已打上班卡 | JWT |
//! | /api/check-ins | GET | 全部打卡记录 | 管理员 |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/check-ins", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/", post(handler::create))
        .route("/me", get(handler::list_mine))
        .route("/today", get(handler::today_status));

    let admin_routes = Router::new()
        .route("/", get(handler::list_all))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
