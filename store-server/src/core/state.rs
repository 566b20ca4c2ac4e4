use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::payment::PaymentGateway;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是店铺 API 的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | gateway | PaymentGateway | 支付网关客户端 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 支付网关客户端
    pub gateway: PaymentGateway,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize()`] 方法代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        gateway: PaymentGateway,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            gateway,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据目录 (确保存在)
    /// 2. 数据库 (data_dir/database/store.db)
    /// 3. JWT 服务和支付网关客户端
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        // 0. Ensure data_dir structure exists
        let db_dir = std::path::Path::new(&config.data_dir).join("database");
        std::fs::create_dir_all(&db_dir).expect("Failed to create data directory structure");

        // 1. Initialize DB
        let db_path = db_dir.join("store.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        // 2. Initialize services
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let gateway = PaymentGateway::new(
            config.gateway_api_base.clone(),
            config.gateway_key_id.clone(),
            config.gateway_key_secret.clone(),
        );

        Self::new(config.clone(), db_service.db, jwt_service, gateway)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
