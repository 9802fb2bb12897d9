//! Checkout Aggregator

use serde::Serialize;
use shared::Pagination;
use shared::models::{
    CheckoutHistoryQuery, CheckoutRequest, CheckoutStatus, MenuSummaryLine, OrderStatus,
    PaymentMethod,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{info, warn};

use super::aggregate;
use super::error::CheckoutError;
use crate::auth::{Capability, CurrentUser};
use crate::db::models::{Checkout, CheckoutLine, Order, Pin};
use crate::db::repository::checkout::{CheckoutFilter, NewCheckout, ORDERS_CHANGED, PIN_NOT_ACTIVE};
use crate::db::repository::{CheckoutRepository, OrderRepository, PinRepository, RepoError};
use crate::utils::time;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Bill preview for an active session (read only)
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPreview {
    pub pin_id: String,
    pub pin_code: String,
    pub dining_table: String,
    pub table_number: String,
    /// One line per completed order
    pub items: Vec<CheckoutLine>,
    pub menu_summary: Vec<MenuSummaryLine>,
    pub total_amount: f64,
}

/// One page of checkout history
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPage {
    pub checkouts: Vec<Checkout>,
    pub pagination: Pagination,
}

/// Summarizes completed orders into a receipt and closes the session
#[derive(Clone)]
pub struct CheckoutAggregator {
    pins: PinRepository,
    orders: OrderRepository,
    checkouts: CheckoutRepository,
}

impl CheckoutAggregator {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            pins: PinRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            checkouts: CheckoutRepository::new(db),
        }
    }

    /// Active session plus its completed orders (non-empty)
    async fn billable(&self, pin_id: &str) -> Result<(Pin, Vec<Order>), CheckoutError> {
        let rid = PinRepository::record_id(pin_id).map_err(|_| CheckoutError::SessionNotActive)?;
        let pin = self
            .pins
            .find_by_id(&rid)
            .await?
            .filter(Pin::is_active)
            .ok_or(CheckoutError::SessionNotActive)?;

        let orders = self
            .orders
            .find_by_pin_and_status(&rid, OrderStatus::Completed)
            .await?;
        if orders.is_empty() {
            return Err(CheckoutError::NoCompletedOrders);
        }
        Ok((pin, orders))
    }

    pub async fn preview(
        &self,
        actor: &CurrentUser,
        pin_id: &str,
    ) -> Result<CheckoutPreview, CheckoutError> {
        actor.require(Capability::CheckoutPreview)?;
        let (pin, orders) = self.billable(pin_id).await?;

        let items = aggregate::snapshot(&orders);
        let menu_summary = aggregate::group_by_name(&items)?;
        let total_amount = aggregate::total_amount(&items)?;

        Ok(CheckoutPreview {
            pin_id: pin.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            pin_code: pin.code,
            dining_table: pin.dining_table.to_string(),
            table_number: pin.table_number,
            items,
            menu_summary,
            total_amount,
        })
    }

    /// Bill the session: write a `paid` checkout and close the PIN, all or nothing
    pub async fn finalize(
        &self,
        actor: &CurrentUser,
        req: CheckoutRequest,
    ) -> Result<Checkout, CheckoutError> {
        actor.require(Capability::CheckoutFinalize)?;

        let payment_method = match req.payment_method.as_deref().map(str::trim) {
            None | Some("") => PaymentMethod::default(),
            Some(method) => method.parse()?,
        };

        let (pin, orders) = self.billable(&req.pin_id).await?;
        let pin_rid = pin.id.clone().ok_or(CheckoutError::SessionNotActive)?;

        let items = aggregate::snapshot(&orders);
        let total_amount = aggregate::total_amount(&items)?;
        if !aggregate::total_matches(total_amount, &items, &orders) {
            return Err(CheckoutError::TotalMismatch {
                computed: total_amount,
            });
        }

        let order_ids = orders.iter().filter_map(|o| o.id.clone()).collect();

        let checkout = self
            .checkouts
            .finalize(NewCheckout {
                pin: pin_rid.clone(),
                dining_table: pin.dining_table,
                table_number: pin.table_number,
                pin_code: pin.code,
                order_ids,
                items,
                total_amount,
                payment_method,
                paid_by: Some(actor.id.clone()),
                paid_by_name: Some(actor.username.clone()),
                paid_at: time::now_millis(),
            })
            .await
            .map_err(|e| {
                warn!(pin_id = %pin_rid, error = %e, "Finalize rejected");
                match e {
                    e if e.is_aborted(PIN_NOT_ACTIVE) => CheckoutError::SessionNotActive,
                    e if e.is_aborted(ORDERS_CHANGED) => CheckoutError::Conflict(
                        "Orders changed during checkout, please review and retry".to_string(),
                    ),
                    RepoError::Duplicate(_) | RepoError::Conflict(_) => CheckoutError::Conflict(
                        "Session is already being checked out".to_string(),
                    ),
                    other => CheckoutError::Repo(other),
                }
            })?;

        info!(
            checkout_id = ?checkout.id,
            pin_id = %pin_rid,
            table = %checkout.table_number,
            total = checkout.total_amount,
            method = %checkout.payment_method,
            by = %actor.username,
            "Checkout finalized"
        );
        Ok(checkout)
    }

    /// Paginated history, newest first
    pub async fn history(
        &self,
        actor: &CurrentUser,
        query: CheckoutHistoryQuery,
    ) -> Result<CheckoutPage, CheckoutError> {
        actor.require(Capability::CheckoutHistory)?;

        let status = non_empty(query.status.as_deref())
            .map(str::parse::<CheckoutStatus>)
            .transpose()?;
        let paid_from = non_empty(query.start_date.as_deref())
            .map(|d| time::parse_date(d).map(time::day_start_millis))
            .transpose()
            .map_err(|e| CheckoutError::InvalidQuery(e.to_string()))?;
        // end_date 包含当天
        let paid_before = non_empty(query.end_date.as_deref())
            .map(|d| time::parse_date(d).map(time::day_end_millis))
            .transpose()
            .map_err(|e| CheckoutError::InvalidQuery(e.to_string()))?;

        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let all = self
            .checkouts
            .find_all(CheckoutFilter {
                status,
                paid_from,
                paid_before,
            })
            .await?;

        let pagination = Pagination::new(page, limit, all.len() as u64);
        let checkouts = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.items_per_page as usize)
            .collect();

        Ok(CheckoutPage {
            checkouts,
            pagination,
        })
    }

    pub async fn get_by_id(&self, actor: &CurrentUser, id: &str) -> Result<Checkout, CheckoutError> {
        actor.require(Capability::CheckoutHistory)?;
        let rid = CheckoutRepository::record_id(id)?;
        self.checkouts
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| CheckoutError::NotFound(id.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
