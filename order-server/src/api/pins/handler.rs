//! PIN Session API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{OpenTableRequest, PinListQuery};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Pin;
use crate::utils::{AppResult, ok, ok_with_message};

/// GET /api/pins/pin/{code} - 顾客扫码查 PIN
pub async fn lookup(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<Pin>>> {
    Ok(ok(state.pins.lookup_by_code(&code).await?))
}

/// GET /api/pins - 所有会话
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PinListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Pin>>>> {
    let pins = state
        .pins
        .list_sessions(&user, query.status.as_deref())
        .await?;
    Ok(ok(pins))
}

/// GET /api/pins/active - 进行中的会话
pub async fn list_active(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Pin>>>> {
    Ok(ok(state.pins.list_active(&user).await?))
}

/// POST /api/pins - 开台
pub async fn open(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OpenTableRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Pin>>)> {
    let pin = state.pins.open_table(&user, &payload.table_id).await?;
    Ok((StatusCode::CREATED, ok_with_message(pin, "Table opened")))
}

/// PATCH /api/pins/{id}/close - 关台
pub async fn close(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Pin>>> {
    let pin = state.pins.close_session(&user, &id).await?;
    Ok(ok_with_message(pin, "Session closed"))
}

/// PATCH /api/pins/{id}/paid - 标记已付款
pub async fn mark_paid(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Pin>>> {
    let pin = state.pins.mark_paid(&user, &id).await?;
    Ok(ok_with_message(pin, "Session marked as paid"))
}
