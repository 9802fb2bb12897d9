//! 结账
//!
//! 预览只读；结账在一个事务里关闭 PIN 并写入 `paid` 结账单，两者同成同败。
//! 结账单保存订单快照，之后修改订单或菜单不影响已出的小票。

pub mod aggregate;
pub mod aggregator;
pub mod error;

pub use aggregator::{CheckoutAggregator, CheckoutPage, CheckoutPreview};
pub use error::CheckoutError;
