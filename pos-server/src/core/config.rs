use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::auth::JwtConfig;

/// 服务器配置 - 门店服务器的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/banhmi/pos | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | BUSINESS_TIMEZONE | Asia/Ho_Chi_Minh | 营业时区 (统计口径) |
/// | UPLOAD_ENDPOINT | (空) | 媒体上传地址 |
/// | UPLOAD_PRESET | banhmi_unsigned | 媒体上传 preset |
/// | OFFLINE_ADMIN_USERNAME | admin | 离线管理员账号 |
/// | OFFLINE_ADMIN_PASSWORD | 123456 | 离线管理员密码 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/pos HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 营业时区 — 所有按天/周/月的统计都以此时区为准
    pub timezone: Tz,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    /// 媒体上传地址 (Cloudinary 风格 unsigned upload)
    pub upload_endpoint: String,
    /// 媒体上传 preset 名
    pub upload_preset: String,

    /// 离线管理员账号 — 数据库里没有任何管理员时的兜底登录，
    /// 单机部署断网时仍能进入后台
    pub offline_admin_username: String,
    /// 离线管理员密码
    pub offline_admin_password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|tz| Tz::from_str(&tz).ok())
            .unwrap_or(chrono_tz::Asia::Ho_Chi_Minh);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/banhmi/pos".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            timezone,
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            upload_endpoint: std::env::var("UPLOAD_ENDPOINT").unwrap_or_default(),
            upload_preset: std::env::var("UPLOAD_PRESET")
                .unwrap_or_else(|_| "banhmi_unsigned".into()),

            offline_admin_username: std::env::var("OFFLINE_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".into()),
            offline_admin_password: std::env::var("OFFLINE_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "123456".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
