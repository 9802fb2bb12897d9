//! Shared types for the QR ordering backend
//!
//! Wire-level types used by the order server and its clients (customer web
//! app, staff dashboard): role and status enums, request payloads, the
//! unified response envelope and real-time notification messages.

pub mod message;
pub mod models;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use message::{Notification, NotificationEvent};
pub use response::{ApiResponse, Pagination};

/// Error returned when parsing one of the string-backed enums fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
