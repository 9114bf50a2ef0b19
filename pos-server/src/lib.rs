//! Bánh Mì POS Server - 门店销售点单机服务器
//!
//! # 架构概述
//!
//! 单机部署的门店服务器：柜台终端通过 HTTP API 点单结账，
//! 所有数据落在嵌入式 SurrealDB，变更通过 WebSocket 推送到各终端。
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **购物车** (`cart`): 每员工内存购物车
//! - **结账** (`orders`): 下单 + 尽力而为的库存扣减
//! - **统计** (`stats`): 按营业时区的日/周/月营收汇总
//! - **考勤** (`checkin`): GPS + 自拍打卡
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证
//! ├── api/           # HTTP 路由和处理器
//! ├── cart/          # 购物车
//! ├── orders/        # 结账服务
//! ├── stats/         # 营收统计
//! ├── checkin/       # 考勤
//! ├── notify/        # 通知队列
//! ├── sync/          # 实时同步广播
//! ├── media/         # 媒体上传
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkin;
pub mod core;
pub mod db;
pub mod media;
pub mod notify;
pub mod orders;
pub mod stats;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use cart::{Cart, CartStore};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ___    _   ____  __   __  ____    ____  ____  _____
   / __ )/   |  / | / / / / /  /  |/  (_)  / __ \/ __ \/ ___/
  / __  / /| | /  |/ / /_/ /  / /|_/ / /  / /_/ / / / /\__ \
 / /_/ / ___ |/ /|  / __  /  / /  / / /  / ____/ /_/ /___/ /
/_____/_/  |_/_/ |_/_/ /_/  /_/  /_/_/  /_/    \____//____/
    "#
    );
}
