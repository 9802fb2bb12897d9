//! Checkout Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{CheckoutStatus, PaymentMethod};
use surrealdb::RecordId;

/// Frozen copy of one order line at checkout time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub order_id: String,
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub total: f64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Finalized, immutable billing record for one session (结账单)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkout {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub dining_table: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub pin: RecordId,
    pub table_number: String,
    pub pin_code: String,
    pub items: Vec<CheckoutLine>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub status: CheckoutStatus,
    pub paid_at: i64,
    /// Staff member who processed the payment
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub paid_by_name: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}
