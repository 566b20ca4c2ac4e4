//! Authentication Module
//!
//! JWT 认证、请求提取器和中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::MaybeUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
