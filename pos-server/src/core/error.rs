use thiserror::Error;

/// 服务器启动/运行期错误
///
/// 请求处理期的错误用 [`crate::utils::AppError`]，
/// 这里只覆盖启动和监听阶段。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("监听失败: {0}")]
    Bind(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 核心模块的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
