//! Menu Item Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Menu item entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Category reference
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Opaque image reference
    #[serde(default)]
    pub image: Option<String>,
    #[serde(
        default = "serde_helpers::default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_visible: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl MenuItem {
    /// Orderable by customers
    pub fn is_available(&self) -> bool {
        self.is_visible && !self.is_deleted
    }
}
