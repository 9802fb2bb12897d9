//! Per-session order summary

use shared::models::{OrderSummary, StatusCount};

use crate::db::models::Order;
use crate::utils::money::{self, MoneyError};

/// Item count, price total and per-status counts across every order given
///
/// Cancelled lines are counted like any other; the summary describes what
/// was ordered, not what will be billed.
pub fn summarize(orders: &[Order]) -> Result<OrderSummary, MoneyError> {
    let mut status_count = StatusCount::default();
    for order in orders {
        status_count.record(order.status);
    }

    Ok(OrderSummary {
        total_items: orders.iter().map(|o| o.quantity).sum(),
        total_price: money::sum(orders.iter().map(|o| o.total_price))?,
        order_count: orders.len() as u64,
        status_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus;
    use surrealdb::RecordId;

    fn order(quantity: i64, total_price: f64, status: OrderStatus) -> Order {
        Order {
            id: None,
            pin: RecordId::from_table_key("pin", "p1"),
            dining_table: RecordId::from_table_key("dining_table", "t1"),
            menu_item: RecordId::from_table_key("menu_item", "m1"),
            quantity,
            total_price,
            note: None,
            status,
            created_at: 0,
            updated_at: 0,
            item_name: None,
            item_price: None,
            item_image: None,
        }
    }

    #[test]
    fn empty_session_summary() {
        assert_eq!(summarize(&[]), Ok(OrderSummary::default()));
    }

    #[test]
    fn counts_every_status() {
        let orders = vec![
            order(2, 100.0, OrderStatus::Pending),
            order(1, 0.1, OrderStatus::Cooking),
            order(3, 0.2, OrderStatus::Cooking),
            order(1, 45.5, OrderStatus::Cancel),
        ];
        let summary = summarize(&orders).unwrap();

        assert_eq!(summary.total_items, 7);
        assert_eq!(summary.total_price, 145.8);
        assert_eq!(summary.order_count, 4);
        assert_eq!(summary.status_count.pending, 1);
        assert_eq!(summary.status_count.cooking, 2);
        assert_eq!(summary.status_count.cancel, 1);
        assert_eq!(summary.status_count.completed, 0);
    }
}
