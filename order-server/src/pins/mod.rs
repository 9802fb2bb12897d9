//! PIN 会话管理
//!
//! 开台生成唯一 PIN，每张桌台同一时间最多一个 `active` 会话。
//!
//! ```text
//! open_table ──▶ deactivate old + insert new (一个事务)
//!                  │ 唯一索引冲突 (code / active_slot)
//!                  ▼
//!            retry_bounded (最多 max_attempts 次) ──▶ ExhaustedRetries
//! ```

pub mod code;
pub mod error;
pub mod manager;
pub mod retry;

pub use code::{CodeGenerator, PIN_ALPHABET};
pub use error::PinError;
pub use manager::PinManager;
pub use retry::{RetryError, retry_bounded};
