//! Store Server - 店铺 API 服务
//!
//! # 架构概述
//!
//! 本模块是店面和后台共用的 REST API 服务，提供以下核心功能：
//!
//! - **结账流程** (`checkout`): 购物车定价、下单和支付对账
//! - **支付网关** (`payment`): REST 客户端 + 回调签名校验
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 购物车 → 订单工作流
//! ├── payment/       # 支付网关集成
//! ├── db/            # 数据库层 (模型 + 仓储)
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use checkout::{CheckoutService, VerifyOutcome};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:ident, $event:expr $(, $($fields:tt)+)?) => {
        tracing::event!(
            target: "security",
            tracing::Level::$level,
            event = $event
            $(, $($fields)+)?
        );
    };
}

/// 环境准备: .env 加载 + 日志初始化
pub fn setup_environment() {
    let _ = dotenv::dotenv();
    init_logger();
}
