//! Auth API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/login | POST | 登录 (用户名或手机号) | 无 |
//! | /api/auth/register | POST | 自助注册 (pending 账号) | 无 |
//! | /api/auth/logout | POST | 登出 | JWT |
//! | /api/auth/me | GET | 当前用户信息 | JWT |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/register", post(handler::register))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
