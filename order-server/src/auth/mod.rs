//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌验证
//! - [`CurrentUser`] - 当前用户上下文 (axum extractor)
//! - [`OptionalUser`] - 公开路由的可选身份
//! - [`Capability`] - 能力表 (action → 最低角色)
//! - [`RateLimiter`] - 下单限流

pub mod extractor;
pub mod jwt;
pub mod permissions;
pub mod rate_limit;

pub use extractor::OptionalUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use permissions::{Capability, PermissionDenied};
pub use rate_limit::{RateLimiter, order_rate_limit};
