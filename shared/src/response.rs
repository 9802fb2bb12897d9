//! API Response types
//!
//! Every endpoint answers with the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "OK",
//!     "data": { ... }
//! }
//! ```
//! Paginated endpoints add a `pagination` object.

use serde::{Deserialize, Serialize};

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self::ok_with_message(data, "OK")
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
        }
    }

    /// Create a successful paginated response
    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
            pagination: Some(pagination),
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            pagination: None,
        }
    }
}

/// Page metadata derived from the total item count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// `page` is 1-based; `limit` must be non-zero
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(limit.max(1));
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    /// Number of items before the current page, saturating for huge pages
    pub fn offset(&self) -> usize {
        let offset = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page);
        usize::try_from(offset).unwrap_or(usize::MAX)
    }
}
