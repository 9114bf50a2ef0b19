//! Sync WebSocket Module
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/sync/ws | GET | 升级为 WebSocket，推送 SyncPayload | JWT |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync/ws", get(handler::handle_sync_ws))
}
