//! Real-time notification messages
//!
//! Pushed by the order server to staff dashboards whenever an order is
//! created, changes status or is removed. Delivery is best-effort.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Notification event name (wire form `order:created` etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationEvent {
    #[serde(rename = "order:created")]
    OrderCreated,
    #[serde(rename = "order:updated")]
    OrderUpdated,
    #[serde(rename = "order:deleted")]
    OrderDeleted,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::OrderCreated => "order:created",
            NotificationEvent::OrderUpdated => "order:updated",
            NotificationEvent::OrderDeleted => "order:deleted",
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broadcast notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub event: NotificationEvent,
    pub payload: serde_json::Value,
    /// Unix millis
    pub timestamp: i64,
}

impl Notification {
    pub fn new(event: NotificationEvent, payload: serde_json::Value) -> Self {
        Self {
            event,
            payload,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn order_created(payload: serde_json::Value) -> Self {
        Self::new(NotificationEvent::OrderCreated, payload)
    }

    pub fn order_updated(payload: serde_json::Value) -> Self {
        Self::new(NotificationEvent::OrderUpdated, payload)
    }

    pub fn order_deleted(order_id: &str) -> Self {
        Self::new(
            NotificationEvent::OrderDeleted,
            serde_json::json!({ "order_id": order_id }),
        )
    }
}
