//! Category Model

use serde::{Deserialize, Serialize};

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub is_visible: Option<bool>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

/// Category / menu list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuListQuery {
    #[serde(default)]
    pub include_hidden: bool,
    pub category_id: Option<String>,
}
