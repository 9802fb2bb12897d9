//! 实时通知
//!
//! ```text
//! OrderLedger ──▶ NotificationSink::notify() ──▶ broadcast::Sender<Notification>
//!                                                   │
//!                                                   ▼
//!                                          /api/events (SSE 订阅者)
//! ```

pub mod bus;

pub use bus::{MessageBus, NotificationSink};
pub use shared::message::{Notification, NotificationEvent};
