//! Checkout Repository

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{Checkout, CheckoutLine};
use shared::models::{CheckoutStatus, PaymentMethod};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "checkout";

/// Thrown when the session is no longer active
pub const PIN_NOT_ACTIVE: &str = "pin_not_active";
/// Thrown when the completed-order set moved since the snapshot was taken
pub const ORDERS_CHANGED: &str = "orders_changed";

/// Close the session and write the receipt as one unit.
///
/// The session update only matches while `active`; a concurrent finalize
/// either sees zero rows or conflicts on the same record. `checkout_pin`
/// rejects a second receipt outright.
const FINALIZE: &str = r#"
BEGIN TRANSACTION;
LET $closed = (UPDATE $pin SET status = 'inactive', active_slot = <string>id, closed_at = $now
    WHERE status = 'active' RETURN id);
IF array::len($closed) == 0 { THROW "pin_not_active"; };
LET $completed = (SELECT VALUE id FROM order WHERE pin = $pin AND status = 'completed');
IF array::len($completed) != array::len($order_ids)
    OR array::len(array::complement($completed, $order_ids)) > 0 { THROW "orders_changed"; };
CREATE $id SET dining_table = $table, pin = $pin, table_number = $table_number,
    pin_code = $pin_code, items = $items, total_amount = $total_amount,
    payment_method = $payment_method, status = 'paid', paid_at = $now,
    paid_by = $paid_by, paid_by_name = $paid_by_name, created_at = $now;
COMMIT TRANSACTION;
"#;

/// Everything needed to write one receipt
#[derive(Debug, Clone)]
pub struct NewCheckout {
    pub pin: RecordId,
    pub dining_table: RecordId,
    pub table_number: String,
    pub pin_code: String,
    /// Ids of the completed orders the snapshot was built from
    pub order_ids: Vec<RecordId>,
    pub items: Vec<CheckoutLine>,
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub paid_by: Option<String>,
    pub paid_by_name: Option<String>,
    pub paid_at: i64,
}

/// History filters (already parsed); `paid_before` is exclusive
#[derive(Debug, Clone, Default)]
pub struct CheckoutFilter {
    pub status: Option<CheckoutStatus>,
    pub paid_from: Option<i64>,
    pub paid_before: Option<i64>,
}

#[derive(Clone)]
pub struct CheckoutRepository {
    base: BaseRepository,
}

impl CheckoutRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Close the session and create a `paid` checkout atomically
    ///
    /// Aborts with [`PIN_NOT_ACTIVE`] or [`ORDERS_CHANGED`]; a lost race
    /// surfaces as [`RepoError::Conflict`] or [`RepoError::Duplicate`].
    pub async fn finalize(&self, data: NewCheckout) -> RepoResult<Checkout> {
        let id = new_record_id(TABLE);
        let mut response = self
            .base
            .db()
            .query(FINALIZE)
            .bind(("id", id.clone()))
            .bind(("pin", data.pin))
            .bind(("table", data.dining_table))
            .bind(("table_number", data.table_number))
            .bind(("pin_code", data.pin_code))
            .bind(("order_ids", data.order_ids))
            .bind(("items", data.items))
            .bind(("total_amount", data.total_amount))
            .bind(("payment_method", data.payment_method.as_str()))
            .bind(("paid_by", data.paid_by))
            .bind(("paid_by_name", data.paid_by_name))
            .bind(("now", data.paid_at))
            .await?;
        check_response(&mut response, &[PIN_NOT_ACTIVE, ORDERS_CHANGED])?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("Checkout {} missing after finalize", id)))
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Checkout>> {
        let checkout: Option<Checkout> = self.base.db().select(id.clone()).await?;
        Ok(checkout)
    }

    /// Matching checkouts, newest first
    pub async fn find_all(&self, filter: CheckoutFilter) -> RepoResult<Vec<Checkout>> {
        let mut conditions = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.paid_from.is_some() {
            conditions.push("paid_at >= $paid_from");
        }
        if filter.paid_before.is_some() {
            conditions.push("paid_at < $paid_before");
        }

        let mut sql = String::from("SELECT * FROM checkout");
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY paid_at DESC");

        let checkouts: Vec<Checkout> = self
            .base
            .db()
            .query(sql)
            .bind(("status", filter.status.map(|s| s.as_str())))
            .bind(("paid_from", filter.paid_from))
            .bind(("paid_before", filter.paid_before))
            .await?
            .take(0)?;
        Ok(checkouts)
    }
}
