//! Database Models
//!
//! Stored entities as read back from SurrealDB. Request payloads live in
//! `shared::models`.

// Serde helpers
pub mod serde_helpers;

// Directory
pub mod category;
pub mod dining_table;
pub mod menu_item;

// Sessions & Orders
pub mod order;
pub mod pin;

// Billing
pub mod checkout;

// Re-exports
pub use category::*;
pub use checkout::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use pin::*;
