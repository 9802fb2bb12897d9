//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{DiningTableCreate, DiningTableUpdate};

use crate::auth::{Capability, CurrentUser};
use crate::core::ServerState;
use crate::db::models::DiningTable;
use crate::db::repository::DiningTableRepository;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

fn table_number(raw: &str) -> AppResult<String> {
    let number = raw.trim();
    if number.is_empty() {
        return Err(AppError::validation("table_number is required"));
    }
    Ok(number.to_string())
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let repo = DiningTableRepository::new(state.get_db());
    let tables = repo.find_all().await?;
    Ok(ok(tables))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.find_live(&DiningTableRepository::record_id(&id)?).await?;
    Ok(ok(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<DiningTable>>)> {
    user.require(Capability::ManageTables)?;
    let number = table_number(&payload.table_number)?;

    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.create(number).await?;
    tracing::info!(table = %table.table_number, by = %user.username, "Dining table created");

    Ok((StatusCode::CREATED, ok_with_message(table, "Table created")))
}

/// PUT /api/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    user.require(Capability::ManageTables)?;

    let repo = DiningTableRepository::new(state.get_db());
    let rid = DiningTableRepository::record_id(&id)?;
    let table = match payload.table_number.as_deref() {
        Some(raw) => repo.update(&rid, table_number(raw)?).await?,
        None => repo.find_live(&rid).await?,
    };

    Ok(ok_with_message(table, "Table updated"))
}

/// DELETE /api/tables/{id} - 删除桌台 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    user.require(Capability::ManageTables)?;

    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.soft_delete(&DiningTableRepository::record_id(&id)?).await?;
    tracing::info!(table = %table.table_number, by = %user.username, "Dining table deleted");

    Ok(ok_with_message(table, "Table deleted"))
}
