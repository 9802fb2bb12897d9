//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;
use surrealdb::RecordId;

/// One order line placed under a PIN session
///
/// `item_name`, `item_price` and `item_image` are resolved from the menu item
/// link at read time and are never written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub pin: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub quantity: i64,
    /// `unit price × quantity` at creation time
    pub total_price: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_image: Option<String>,
}

impl Order {
    /// Unit price: the linked menu price, else derived from the stored total
    pub fn unit_price(&self) -> f64 {
        match self.item_price {
            Some(price) => price,
            None if self.quantity > 0 => self.total_price / self.quantity as f64,
            None => 0.0,
        }
    }

    /// Display name: the linked menu name, else the menu item id
    pub fn display_name(&self) -> String {
        self.item_name
            .clone()
            .unwrap_or_else(|| self.menu_item.to_string())
    }
}
