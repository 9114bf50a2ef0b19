use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use crate::auth::JwtService;
use crate::cart::CartStore;
use crate::checkin::CheckInService;
use crate::core::Config;
use crate::db::DbService;
use crate::media::MediaUploader;
use crate::notify::{NotifyRequest, NotifyService, NotifyWorker};
use crate::orders::CheckoutService;
use crate::sync::SyncBroadcaster;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是门店服务器的核心数据结构，使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | carts | Arc<CartStore> | 每员工购物车 (内存态) |
/// | notify | NotifyService | 通知队列句柄 |
/// | sync | Arc<SyncBroadcaster> | 实时同步广播 |
/// | media | Arc<MediaUploader> | 媒体上传客户端 |
/// | checkout | CheckoutService | 结账服务 |
/// | check_in | CheckInService | 考勤服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 每员工购物车
    pub carts: Arc<CartStore>,
    /// 通知入队句柄
    pub notify: NotifyService,
    /// 实时同步广播
    pub sync: Arc<SyncBroadcaster>,
    /// 媒体上传客户端
    pub media: Arc<MediaUploader>,
    /// 结账服务
    pub checkout: CheckoutService,
    /// 考勤服务
    pub check_in: CheckInService,
    /// 通知 worker 的接收端，start_background_tasks 取走
    notify_rx: Arc<Mutex<Option<mpsc::Receiver<NotifyRequest>>>>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/pos.db)
    /// 3. 各服务 (JWT, Cart, Sync, Notify, Media, Checkout, CheckIn)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("pos.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config, db_service.db)
    }

    /// 使用已有数据库构造 (测试用内存库也走这里)
    pub fn with_db(config: &Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let carts = Arc::new(CartStore::new());
        let sync = Arc::new(SyncBroadcaster::default());
        let media = Arc::new(MediaUploader::new(
            config.upload_endpoint.clone(),
            config.upload_preset.clone(),
        ));
        let (notify, notify_rx) = NotifyService::new();

        let checkout = CheckoutService::new(
            db.clone(),
            carts.clone(),
            notify.clone(),
            sync.clone(),
        );
        let check_in = CheckInService::new(
            db.clone(),
            media.clone(),
            notify.clone(),
            sync.clone(),
            config.timezone,
        );

        Self {
            config: config.clone(),
            db,
            jwt_service,
            carts,
            notify,
            sync,
            media,
            checkout,
            check_in,
            notify_rx: Arc::new(Mutex::new(Some(notify_rx))),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用。重复调用是 no-op。
    ///
    /// 启动的任务：
    /// - 通知 worker (NotifyWorker)
    pub fn start_background_tasks(&self) {
        let rx = self.notify_rx.lock().expect("notify_rx lock").take();
        if let Some(rx) = rx {
            let worker = NotifyWorker::new(self.db.clone(), self.sync.clone());
            tokio::spawn(worker.run(rx));
        }
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 广播同步消息
    ///
    /// 向所有连接的终端广播资源变更通知。
    /// 版本号由 SyncBroadcaster 自动递增管理。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "user", "menu_item", "order")
    /// - `action`: 变更类型 ("created", "updated", "deleted")
    /// - `id`: 资源 ID
    /// - `data`: 资源数据 (deleted 时为 None)
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        self.sync.publish(resource, action, id, data);
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
