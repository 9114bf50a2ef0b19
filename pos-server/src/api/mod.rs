//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`upload`] - 媒体上传接口
//! - [`sync`] - 实时同步 WebSocket
//! - [`users`] - 账号管理接口
//! - [`menu_items`] - 菜单管理接口
//! - [`orders`] - 购物车与订单接口
//! - [`statistics`] - 营收统计接口
//! - [`check_ins`] - 考勤接口
//! - [`shifts`] - 排班接口
//! - [`notifications`] - 通知接口

pub mod auth;
pub mod health;
pub mod sync;
pub mod upload;

// Data models API
pub mod check_ins;
pub mod menu_items;
pub mod notifications;
pub mod orders;
pub mod shifts;
pub mod statistics;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
