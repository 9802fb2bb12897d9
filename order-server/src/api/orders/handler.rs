//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{OrderListQuery, OrderStatusUpdate, PlaceOrderRequest};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::orders::{PinOrders, PlacedOrders};
use crate::utils::{AppResult, ok, ok_with_message};

/// GET /api/orders/pin/{code} - 顾客查看本桌订单
pub async fn by_pin(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<PinOrders>>> {
    Ok(ok(state.orders.query_by_pin(&code).await?))
}

/// POST /api/orders - 顾客下单
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PlacedOrders>>)> {
    let placed = state.orders.place_order(payload).await?;
    Ok((StatusCode::CREATED, ok_with_message(placed, "Order placed")))
}

/// GET /api/orders - 进行中会话的订单
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.query_all(&user, query).await?))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state
        .orders
        .advance_status(&user, &id, &payload.status)
        .await?;
    Ok(ok_with_message(order, "Order status updated"))
}

/// DELETE /api/orders/{id} - 删除订单 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.delete_order(&user, &id).await?;
    Ok(ok_with_message(order, "Order deleted"))
}
