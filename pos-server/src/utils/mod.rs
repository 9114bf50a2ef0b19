//! 工具模块
//!
//! - [`error`] - 统一错误处理 ([`AppError`], [`AppResponse`])
//! - [`time`] - 业务时区时间转换
//! - [`logger`] - tracing 日志初始化

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult};
