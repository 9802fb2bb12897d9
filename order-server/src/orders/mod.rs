//! 订单账本
//!
//! 顾客凭 PIN 下单，员工推进状态，管理员可删除。
//!
//! ```text
//! place_order ──▶ 校验 PIN (active) ──▶ 逐项解析菜单 (不可用则跳过)
//!                                        │
//!                                        ▼
//!                        create_batch (事务内再次校验 PIN)
//!                                        │
//!                                        ▼
//!                          NotificationSink ── order:created
//! ```

pub mod error;
pub mod ledger;
pub mod summary;

pub use error::OrderError;
pub use ledger::{OrderLedger, PinOrders, PlacedOrders};
pub use summary::summarize;
