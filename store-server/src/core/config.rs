use crate::auth::JwtConfig;

/// 服务器配置 - 店铺 API 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | /var/lib/store | 数据目录 (嵌入式数据库) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | GATEWAY_API_BASE | https://api.razorpay.com | 支付网关地址 |
/// | GATEWAY_KEY_ID | (空) | 支付网关 Key ID |
/// | GATEWAY_KEY_SECRET | (空) | 支付网关共享密钥 |
/// | EXPRESS_DELIVERY_FEE | 100 | 加急配送附加费 |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/data/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录，存储嵌入式数据库和日志
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 支付网关配置 ===
    /// 支付网关 REST API 地址
    pub gateway_api_base: String,
    /// 支付网关 Key ID (basic auth 用户名)
    pub gateway_key_id: String,
    /// 支付网关共享密钥 (basic auth 密码 + 回调签名校验)
    pub gateway_key_secret: String,
    /// 结算货币
    pub currency: String,

    // === 结算配置 ===
    /// 加急配送附加费 (标准配送免费)
    pub express_delivery_fee: f64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/var/lib/store".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            gateway_api_base: std::env::var("GATEWAY_API_BASE")
                .unwrap_or_else(|_| "https://api.razorpay.com".into()),
            gateway_key_id: std::env::var("GATEWAY_KEY_ID").unwrap_or_default(),
            gateway_key_secret: std::env::var("GATEWAY_KEY_SECRET").unwrap_or_default(),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".into()),

            express_delivery_fee: std::env::var("EXPRESS_DELIVERY_FEE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100.0),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
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
