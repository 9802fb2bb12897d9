//! Order Ledger

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use shared::message::Notification;
use shared::models::{OrderListQuery, OrderStatus, OrderSummary, OrderWorkflow, PlaceOrderRequest};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, info, warn};
use validator::Validate;

use super::error::OrderError;
use super::summary::summarize;
use crate::auth::{Capability, CurrentUser};
use crate::db::models::{Order, Pin};
use crate::db::repository::order::{NewOrderLine, OrderFilter, PIN_NOT_ACTIVE};
use crate::db::repository::{
    DiningTableRepository, MenuItemRepository, OrderRepository, PinRepository, RepoError,
};
use crate::message::NotificationSink;
use crate::utils::money;

/// Result of one customer submission
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrders {
    /// Created lines; may be empty when every requested item was unavailable
    pub orders: Vec<Order>,
    pub table_number: String,
    pub pin: String,
    /// Requested lines dropped because the menu item was missing, hidden or deleted
    pub skipped: usize,
}

/// Customer view of one session
#[derive(Debug, Clone, Serialize)]
pub struct PinOrders {
    pub pin: Pin,
    pub orders: Vec<Order>,
    pub summary: OrderSummary,
}

/// Records order lines against active sessions and moves them through the
/// kitchen workflow
#[derive(Clone)]
pub struct OrderLedger {
    pins: PinRepository,
    menu: MenuItemRepository,
    orders: OrderRepository,
    notifier: Arc<dyn NotificationSink>,
    workflow: OrderWorkflow,
}

impl OrderLedger {
    pub fn new(db: Surreal<Db>, notifier: Arc<dyn NotificationSink>, workflow: OrderWorkflow) -> Self {
        Self {
            pins: PinRepository::new(db.clone()),
            menu: MenuItemRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            notifier,
            workflow,
        }
    }

    pub fn workflow(&self) -> OrderWorkflow {
        self.workflow
    }

    async fn active_pin(&self, code: &str) -> Result<Pin, OrderError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(OrderError::PinNotActive);
        }
        self.pins
            .find_by_code(code)
            .await?
            .filter(Pin::is_active)
            .ok_or(OrderError::PinNotActive)
    }

    /// Customer submission
    ///
    /// Unavailable menu items are skipped, not fatal. Duplicate submissions
    /// create duplicate orders.
    pub async fn place_order(&self, req: PlaceOrderRequest) -> Result<PlacedOrders, OrderError> {
        req.validate()?;

        let pin = self.active_pin(&req.pin).await?;
        let pin_rid = pin.id.clone().ok_or(OrderError::PinNotActive)?;

        let requested = req.items.len();
        let mut lines = Vec::with_capacity(requested);
        for item in req.items {
            let Ok(menu_rid) = MenuItemRepository::record_id(&item.menu_item_id) else {
                debug!(menu_item = %item.menu_item_id, "Skipping malformed menu item id");
                continue;
            };
            let Some(menu_item) = self
                .menu
                .find_by_id(&menu_rid)
                .await?
                .filter(|m| m.is_available())
            else {
                debug!(menu_item = %menu_rid, "Skipping unavailable menu item");
                continue;
            };

            let total_price = money::line_total(menu_item.price, item.quantity).map_err(|e| {
                warn!(menu_item = %menu_rid, price = menu_item.price, error = %e, "Menu item cannot be priced");
                e
            })?;
            lines.push(NewOrderLine {
                menu_item: menu_rid,
                quantity: item.quantity,
                total_price,
                note: item.note.filter(|n| !n.trim().is_empty()),
            });
        }
        let skipped = requested - lines.len();

        let orders = self
            .orders
            .create_batch(&pin_rid, &pin.dining_table, lines)
            .await
            .map_err(|e| match e {
                e if e.is_aborted(PIN_NOT_ACTIVE) => OrderError::PinNotActive,
                other => OrderError::Repo(other),
            })?;

        info!(
            table = %pin.table_number,
            pin_id = %pin_rid,
            created = orders.len(),
            skipped,
            "Orders placed"
        );

        let placed = PlacedOrders {
            orders,
            table_number: pin.table_number,
            pin: pin.code,
            skipped,
        };

        // 没有新订单时无需通知厨房
        if !placed.orders.is_empty() {
            self.notifier.notify(Notification::order_created(json!({
                "orders": placed.orders,
                "table_number": placed.table_number,
                "pin": placed.pin,
            })));
        }

        Ok(placed)
    }

    /// Staff move an order to `status`
    pub async fn advance_status(
        &self,
        actor: &CurrentUser,
        order_id: &str,
        status: &str,
    ) -> Result<Order, OrderError> {
        actor.require(Capability::AdvanceOrderStatus)?;
        let to: OrderStatus = status.trim().parse()?;

        let rid = OrderRepository::record_id(order_id)?;
        let current = self
            .orders
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;
        let from = current.status;

        if !self.workflow.allows(from, to) {
            return Err(OrderError::TransitionRejected { from, to });
        }

        let order = match self.workflow {
            OrderWorkflow::Permissive => self.orders.update_status(&rid, to).await?,
            OrderWorkflow::Strict => self.orders.transition(&rid, from, to).await?.ok_or_else(|| {
                warn!(order_id = %rid, %from, %to, "Order status moved concurrently");
                OrderError::Repo(RepoError::Conflict(format!(
                    "Order {} changed status concurrently",
                    rid
                )))
            })?,
        };

        info!(order_id = %rid, %from, %to, by = %actor.username, "Order status changed");
        self.notifier
            .notify(Notification::order_updated(json!({ "order": order })));

        Ok(order)
    }

    /// Hard delete (admin)
    pub async fn delete_order(&self, actor: &CurrentUser, order_id: &str) -> Result<Order, OrderError> {
        actor.require(Capability::DeleteOrder)?;

        let rid = OrderRepository::record_id(order_id)?;
        let removed = self.orders.delete(&rid).await.map_err(|e| match e {
            RepoError::NotFound(_) => OrderError::NotFound(order_id.to_string()),
            other => OrderError::Repo(other),
        })?;

        info!(order_id = %rid, by = %actor.username, "Order deleted");
        self.notifier
            .notify(Notification::order_deleted(&rid.to_string()));

        Ok(removed)
    }

    /// Orders of an active session together with their summary
    pub async fn query_by_pin(&self, code: &str) -> Result<PinOrders, OrderError> {
        let pin = self.active_pin(code).await?;
        let pin_rid = pin.id.clone().ok_or(OrderError::PinNotActive)?;

        let orders = self.orders.find_by_pin(&pin_rid).await?;
        let summary = summarize(&orders)?;
        Ok(PinOrders {
            pin,
            orders,
            summary,
        })
    }

    /// Live operational view: orders under active sessions only
    pub async fn query_all(
        &self,
        actor: &CurrentUser,
        query: OrderListQuery,
    ) -> Result<Vec<Order>, OrderError> {
        actor.require(Capability::ViewAllOrders)?;

        let filter = OrderFilter {
            status: non_empty(query.status.as_deref())
                .map(str::parse::<OrderStatus>)
                .transpose()?,
            pin: non_empty(query.pin_id.as_deref())
                .map(PinRepository::record_id)
                .transpose()?,
            dining_table: non_empty(query.table_id.as_deref())
                .map(DiningTableRepository::record_id)
                .transpose()?,
        };

        Ok(self.orders.find_live(filter).await?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
