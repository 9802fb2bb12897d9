//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::ParseEnumError;

/// Order line status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Cooking,
    Served,
    Completed,
    Cancel,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Cooking,
        OrderStatus::Served,
        OrderStatus::Completed,
        OrderStatus::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancel => "cancel",
        }
    }

    /// `completed` and `cancel` end the kitchen workflow
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancel)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "cooking" => Ok(OrderStatus::Cooking),
            "served" => Ok(OrderStatus::Served),
            "completed" => Ok(OrderStatus::Completed),
            "cancel" => Ok(OrderStatus::Cancel),
            other => Err(ParseEnumError::new("order status", other)),
        }
    }
}

/// Status transition policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderWorkflow {
    /// Any status may move to any other status
    #[default]
    Permissive,
    /// pending → cooking → served → completed, `cancel` from any non-terminal state
    Strict,
}

impl OrderWorkflow {
    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        if from == to {
            return true;
        }
        match self {
            OrderWorkflow::Permissive => true,
            OrderWorkflow::Strict => match (from, to) {
                (_, OrderStatus::Cancel) => !from.is_terminal(),
                (OrderStatus::Pending, OrderStatus::Cooking) => true,
                (OrderStatus::Cooking, OrderStatus::Served) => true,
                (OrderStatus::Served, OrderStatus::Completed) => true,
                _ => false,
            },
        }
    }
}

impl FromStr for OrderWorkflow {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(OrderWorkflow::Permissive),
            "strict" => Ok(OrderWorkflow::Strict),
            other => Err(ParseEnumError::new("order workflow", other)),
        }
    }
}

/// One requested line in a customer order
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    #[validate(length(min = 1, message = "menu_item_id is required"))]
    pub menu_item_id: String,
    #[validate(range(min = 1, max = 9999, message = "quantity must be between 1 and 9999"))]
    pub quantity: i64,
    #[serde(default)]
    pub note: Option<String>,
}

/// Place order payload (customer, via PIN)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "pin is required"))]
    pub pin: String,
    #[validate(length(min = 1, message = "at least one menu item is required"), nested)]
    pub items: Vec<OrderItemInput>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: String,
}

/// Staff order list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub pin_id: Option<String>,
    pub table_id: Option<String>,
}

/// Per-status order counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub pending: u64,
    pub cooking: u64,
    pub served: u64,
    pub completed: u64,
    pub cancel: u64,
}

impl StatusCount {
    pub fn record(&mut self, status: OrderStatus) {
        match status {
            OrderStatus::Pending => self.pending += 1,
            OrderStatus::Cooking => self.cooking += 1,
            OrderStatus::Served => self.served += 1,
            OrderStatus::Completed => self.completed += 1,
            OrderStatus::Cancel => self.cancel += 1,
        }
    }
}

/// Summary of every order under one PIN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_items: i64,
    pub total_price: f64,
    pub order_count: u64,
    pub status_count: StatusCount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_allows_everything() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(OrderWorkflow::Permissive.allows(from, to));
            }
        }
    }

    #[test]
    fn strict_follows_kitchen_flow() {
        let wf = OrderWorkflow::Strict;
        assert!(wf.allows(OrderStatus::Pending, OrderStatus::Cooking));
        assert!(wf.allows(OrderStatus::Cooking, OrderStatus::Served));
        assert!(wf.allows(OrderStatus::Served, OrderStatus::Completed));
        assert!(wf.allows(OrderStatus::Cooking, OrderStatus::Cancel));
        assert!(!wf.allows(OrderStatus::Pending, OrderStatus::Completed));
        assert!(!wf.allows(OrderStatus::Completed, OrderStatus::Cancel));
        assert!(!wf.allows(OrderStatus::Cancel, OrderStatus::Pending));
        assert!(wf.allows(OrderStatus::Completed, OrderStatus::Completed));
    }

    #[test]
    fn place_order_validation() {
        let empty = PlaceOrderRequest {
            pin: "ab12cd".into(),
            items: vec![],
        };
        assert!(empty.validate().is_err());

        let zero_qty = PlaceOrderRequest {
            pin: "ab12cd".into(),
            items: vec![OrderItemInput {
                menu_item_id: "menu_item:a".into(),
                quantity: 0,
                note: None,
            }],
        };
        assert!(zero_qty.validate().is_err());

        let ok = PlaceOrderRequest {
            pin: "ab12cd".into(),
            items: vec![OrderItemInput {
                menu_item_id: "menu_item:a".into(),
                quantity: 2,
                note: Some("no onion".into()),
            }],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("done".parse::<OrderStatus>().is_err());
    }
}
