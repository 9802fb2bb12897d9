//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResult`] - 统一 Result 别名
//! - 日志、时间、金额等工具

pub mod error;
pub mod logger;
pub mod money;
pub mod result;
pub mod time;

pub use error::AppError;
pub use error::{ok, ok_with_message};
pub use result::AppResult;
