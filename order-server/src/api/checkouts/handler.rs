//! Checkout API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{CheckoutHistoryQuery, CheckoutRequest};

use crate::auth::CurrentUser;
use crate::checkout::CheckoutPreview;
use crate::core::ServerState;
use crate::db::models::Checkout;
use crate::utils::{AppResult, ok, ok_with_message};

/// GET /api/checkouts/preview/{pin_id} - 结账预览
pub async fn preview(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(pin_id): Path<String>,
) -> AppResult<Json<ApiResponse<CheckoutPreview>>> {
    Ok(ok(state.checkout.preview(&user, &pin_id).await?))
}

/// POST /api/checkouts - 结账并关闭 PIN
pub async fn finalize(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Checkout>>)> {
    let checkout = state.checkout.finalize(&user, payload).await?;
    Ok((StatusCode::CREATED, ok_with_message(checkout, "Payment recorded")))
}

/// GET /api/checkouts - 结账历史 (分页)
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<CheckoutHistoryQuery>,
) -> AppResult<Json<ApiResponse<Vec<Checkout>>>> {
    let page = state.checkout.history(&user, query).await?;
    Ok(Json(ApiResponse::paginated(page.checkouts, page.pagination)))
}

/// GET /api/checkouts/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Checkout>>> {
    Ok(ok(state.checkout.get_by_id(&user, &id).await?))
}
