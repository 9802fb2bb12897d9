//! Checkout Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// Payment method (支付方式)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Qr,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Qr => "qr",
            PaymentMethod::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "qr" => Ok(PaymentMethod::Qr),
            "card" => Ok(PaymentMethod::Card),
            other => Err(ParseEnumError::new("payment method", other)),
        }
    }
}

/// Checkout record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStatus {
    Pending,
    Paid,
    Cancelled,
}

impl CheckoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Pending => "pending",
            CheckoutStatus::Paid => "paid",
            CheckoutStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for CheckoutStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CheckoutStatus::Pending),
            "paid" => Ok(CheckoutStatus::Paid),
            "cancelled" => Ok(CheckoutStatus::Cancelled),
            other => Err(ParseEnumError::new("checkout status", other)),
        }
    }
}

/// Finalize payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub pin_id: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Checkout history filters (dates are `YYYY-MM-DD`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutHistoryQuery {
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Orders grouped by menu item name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSummaryLine {
    pub name: String,
    pub price: f64,
    pub count: i64,
    pub total: f64,
}
