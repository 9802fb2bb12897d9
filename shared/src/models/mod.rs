//! Data models
//!
//! Enums and request payloads shared between the order server and its
//! clients. Stored entities live in `order-server::db::models`.

pub mod category;
pub mod checkout;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod pin;
pub mod role;

// Re-exports
pub use category::*;
pub use checkout::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use pin::*;
pub use role::*;
