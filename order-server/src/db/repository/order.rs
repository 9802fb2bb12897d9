//! Order Repository
//!
//! Orders link to their session, table and menu item. Reads resolve the menu
//! item brief through the record link; writes never copy it.

use super::{check_response, new_record_id, parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use crate::utils::time::now_millis;
use shared::models::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// Thrown when the session closed before the batch committed
pub const PIN_NOT_ACTIVE: &str = "pin_not_active";

const SELECT_WITH_ITEM: &str = "SELECT *, menu_item.name AS item_name, \
     menu_item.price AS item_price, menu_item.image AS item_image";

/// A priced order line ready to be written
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub menu_item: RecordId,
    pub quantity: i64,
    pub total_price: f64,
    pub note: Option<String>,
}

/// Staff list filters (already parsed)
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub pin: Option<RecordId>,
    pub dining_table: Option<RecordId>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn record_id(id: &str) -> RepoResult<RecordId> {
        parse_record_id(TABLE, id)
    }

    /// Write a batch of `pending` orders in one transaction
    ///
    /// The transaction first touches the session (guarded on `active`), so a
    /// concurrent close either commits before it and aborts the batch with
    /// [`PIN_NOT_ACTIVE`], or conflicts with it.
    pub async fn create_batch(
        &self,
        pin: &RecordId,
        dining_table: &RecordId,
        lines: Vec<NewOrderLine>,
    ) -> RepoResult<Vec<Order>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<RecordId> = lines.iter().map(|_| new_record_id(TABLE)).collect();

        let mut sql = String::from(
            "BEGIN TRANSACTION;\n\
             LET $guard = (UPDATE $pin SET last_order_at = $now WHERE status = 'active' RETURN id);\n\
             IF array::len($guard) == 0 { THROW \"pin_not_active\"; };\n",
        );
        for i in 0..lines.len() {
            sql.push_str(&format!(
                "CREATE $id{i} SET pin = $pin, dining_table = $table, menu_item = $item{i}, \
                 quantity = $qty{i}, total_price = $total{i}, note = $note{i}, \
                 status = 'pending', created_at = $now, updated_at = $now;\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("pin", pin.clone()))
            .bind(("table", dining_table.clone()))
            .bind(("now", now_millis()));
        for (i, (line, id)) in lines.into_iter().zip(ids.iter()).enumerate() {
            query = query
                .bind((format!("id{i}"), id.clone()))
                .bind((format!("item{i}"), line.menu_item))
                .bind((format!("qty{i}"), line.quantity))
                .bind((format!("total{i}"), line.total_price))
                .bind((format!("note{i}"), line.note));
        }

        let mut response = query.await?;
        check_response(&mut response, &[PIN_NOT_ACTIVE])?;

        self.find_many(ids).await
    }

    async fn find_many(&self, ids: Vec<RecordId>) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(format!("{SELECT_WITH_ITEM} FROM $ids"))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(format!("{SELECT_WITH_ITEM} FROM $thing"))
            .bind(("thing", id.clone()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Every order of one session, oldest first
    pub async fn find_by_pin(&self, pin: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(format!(
                "{SELECT_WITH_ITEM} FROM order WHERE pin = $pin ORDER BY created_at ASC"
            ))
            .bind(("pin", pin.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders of one session with the given status, oldest first
    pub async fn find_by_pin_and_status(
        &self,
        pin: &RecordId,
        status: OrderStatus,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(format!(
                "{SELECT_WITH_ITEM} FROM order WHERE pin = $pin AND status = $status \
                 ORDER BY created_at ASC"
            ))
            .bind(("pin", pin.clone()))
            .bind(("status", status.as_str()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders under currently active sessions, newest first
    pub async fn find_live(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        let mut sql = format!("{SELECT_WITH_ITEM} FROM order WHERE pin.status = 'active'");
        if filter.status.is_some() {
            sql.push_str(" AND status = $status");
        }
        if filter.pin.is_some() {
            sql.push_str(" AND pin = $pin");
        }
        if filter.dining_table.is_some() {
            sql.push_str(" AND dining_table = $table");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("status", filter.status.map(|s| s.as_str())))
            .bind(("pin", filter.pin))
            .bind(("table", filter.dining_table))
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn update_status(&self, id: &RecordId, status: OrderStatus) -> RepoResult<Order> {
        let mut response = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("status", status.as_str()))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[])?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Move an order from `from` to `to`; `None` when the status moved first
    pub async fn transition(
        &self,
        id: &RecordId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let mut response = self
            .base
            .db()
            .query("UPDATE $thing SET status = $to, updated_at = $now WHERE status = $from")
            .bind(("thing", id.clone()))
            .bind(("from", from.as_str()))
            .bind(("to", to.as_str()))
            .bind(("now", now_millis()))
            .await?;
        check_response(&mut response, &[])?;

        let touched: Vec<Order> = response.take(0)?;
        if touched.is_empty() {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Hard delete; returns the removed order
    pub async fn delete(&self, id: &RecordId) -> RepoResult<Order> {
        let removed: Vec<Order> = self
            .base
            .db()
            .query("DELETE $thing RETURN BEFORE")
            .bind(("thing", id.clone()))
            .await?
            .take(0)?;
        removed
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
