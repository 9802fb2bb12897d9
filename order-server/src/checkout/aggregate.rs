//! Receipt building: snapshot lines, per-name grouping, totals
//!
//! All amounts are accumulated as `Decimal` and rounded once at the end.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::models::MenuSummaryLine;

use crate::db::models::{CheckoutLine, Order};
use crate::utils::money::{self, MoneyError};

/// Frozen copy of each order line, in order
pub fn snapshot(orders: &[Order]) -> Vec<CheckoutLine> {
    orders
        .iter()
        .map(|o| CheckoutLine {
            order_id: o.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            menu_item_id: o.menu_item.to_string(),
            name: o.display_name(),
            price: o.unit_price(),
            quantity: o.quantity,
            total: o.total_price,
            note: o.note.clone(),
        })
        .collect()
}

/// Group lines by menu item name, keeping first-seen order
///
/// `price` is the unit price of the first line of each group; `total` sums
/// the stored line totals, so it stays correct if the menu price changed
/// between orders.
pub fn group_by_name(lines: &[CheckoutLine]) -> Result<Vec<MenuSummaryLine>, MoneyError> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(MenuSummaryLine, Decimal)> = Vec::new();

    for line in lines {
        let slot = *index.entry(line.name.as_str()).or_insert_with(|| {
            groups.push((
                MenuSummaryLine {
                    name: line.name.clone(),
                    price: line.price,
                    count: 0,
                    total: 0.0,
                },
                Decimal::ZERO,
            ));
            groups.len() - 1
        });
        let (group, total) = &mut groups[slot];
        group.count += line.quantity;
        *total = total
            .checked_add(money::to_decimal(line.total)?)
            .ok_or(MoneyError::Overflow)?;
    }

    Ok(groups
        .into_iter()
        .map(|(mut group, total)| {
            group.total = money::to_f64(total);
            group
        })
        .collect())
}

/// Sum of line totals
pub fn total_amount(lines: &[CheckoutLine]) -> Result<f64, MoneyError> {
    money::sum(lines.iter().map(|l| l.total))
}

/// `total` equals both the snapshot sum and the source orders' sum
pub fn total_matches(total: f64, lines: &[CheckoutLine], orders: &[Order]) -> bool {
    let from_lines = total_amount(lines);
    let from_orders = money::sum(orders.iter().map(|o| o.total_price));
    match (from_lines, from_orders) {
        (Ok(a), Ok(b)) => money::amounts_equal(total, a) && money::amounts_equal(total, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderStatus;
    use surrealdb::RecordId;

    fn completed(key: &str, name: &str, price: f64, quantity: i64) -> Order {
        Order {
            id: Some(RecordId::from_table_key("order", key)),
            pin: RecordId::from_table_key("pin", "p1"),
            dining_table: RecordId::from_table_key("dining_table", "t1"),
            menu_item: RecordId::from_table_key("menu_item", name),
            quantity,
            total_price: money::line_total(price, quantity).unwrap(),
            note: None,
            status: OrderStatus::Completed,
            created_at: 0,
            updated_at: 0,
            item_name: Some(name.to_string()),
            item_price: Some(price),
            item_image: None,
        }
    }

    #[test]
    fn groups_repeated_items() {
        let orders = vec![
            completed("o1", "Pad Thai", 50.0, 2),
            completed("o2", "Tom Yum", 80.0, 1),
            completed("o3", "Pad Thai", 50.0, 1),
        ];
        let lines = snapshot(&orders);
        let groups = group_by_name(&lines).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Pad Thai");
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[0].total, 150.0);
        assert_eq!(groups[1].name, "Tom Yum");
        assert_eq!(groups[1].total, 80.0);
        assert_eq!(total_amount(&lines), Ok(230.0));
    }

    #[test]
    fn group_total_keeps_historic_prices() {
        let mut later = completed("o2", "Pad Thai", 50.0, 1);
        // menu price raised after the first order
        later.total_price = 60.0;
        later.item_price = Some(60.0);
        let orders = vec![completed("o1", "Pad Thai", 50.0, 2), later];

        let groups = group_by_name(&snapshot(&orders)).unwrap();
        assert_eq!(groups[0].price, 50.0);
        assert_eq!(groups[0].total, 160.0);
    }

    #[test]
    fn snapshot_copies_order_data() {
        let mut order = completed("o1", "Som Tam", 45.5, 2);
        order.note = Some("extra spicy".into());
        let lines = snapshot(&[order]);

        assert_eq!(lines[0].order_id, "order:o1");
        assert_eq!(lines[0].name, "Som Tam");
        assert_eq!(lines[0].total, 91.0);
        assert_eq!(lines[0].note.as_deref(), Some("extra spicy"));
    }

    #[test]
    fn total_validation() {
        let orders = vec![completed("o1", "A", 0.1, 1), completed("o2", "B", 0.2, 1)];
        let lines = snapshot(&orders);
        assert!(total_matches(0.3, &lines, &orders));
        assert!(!total_matches(0.31, &lines, &orders));
    }

    #[test]
    fn unrepresentable_totals_never_match() {
        let mut broken = completed("o1", "A", 10.0, 1);
        broken.total_price = f64::NAN;
        let lines = snapshot(std::slice::from_ref(&broken));
        assert!(matches!(group_by_name(&lines), Err(MoneyError::NotFinite(_))));
        assert!(!total_matches(10.0, &lines, &[broken]));
    }
}
