//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{CategoryCreate, CategoryUpdate, MenuListQuery};

use crate::auth::{Capability, CurrentUser, OptionalUser};
use crate::core::ServerState;
use crate::db::models::Category;
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

fn category_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(name.to_string())
}

/// GET /api/categories - 分类列表 (隐藏分类仅员工可见)
pub async fn list(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let include_hidden = query.include_hidden && user.can(Capability::ViewHiddenMenu);
    let repo = CategoryRepository::new(state.get_db());
    Ok(ok(repo.find_all(include_hidden).await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.find_live(&CategoryRepository::record_id(&id)?).await?;
    if !category.is_visible && !user.can(Capability::ViewHiddenMenu) {
        return Err(AppError::not_found(format!("Category {} not found", id)));
    }
    Ok(ok(category))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    user.require(Capability::ManageMenu)?;
    let name = category_name(&payload.name)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(name, payload.is_visible.unwrap_or(true)).await?;
    tracing::info!(category = %category.name, by = %user.username, "Category created");

    Ok((StatusCode::CREATED, ok_with_message(category, "Category created")))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    user.require(Capability::ManageMenu)?;

    let repo = CategoryRepository::new(state.get_db());
    let rid = CategoryRepository::record_id(&id)?;
    let current = repo.find_live(&rid).await?;

    let name = match payload.name.as_deref() {
        Some(raw) => category_name(raw)?,
        None => current.name,
    };
    let is_visible = payload.is_visible.unwrap_or(current.is_visible);

    let category = repo.update(&rid, name, is_visible).await?;
    Ok(ok_with_message(category, "Category updated"))
}

/// PATCH /api/categories/{id}/toggle-visibility
pub async fn toggle_visibility(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    user.require(Capability::ToggleMenuVisibility)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .toggle_visibility(&CategoryRepository::record_id(&id)?)
        .await?;
    Ok(ok_with_message(category, "Visibility updated"))
}

/// DELETE /api/categories/{id} - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    user.require(Capability::ManageMenu)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.soft_delete(&CategoryRepository::record_id(&id)?).await?;
    tracing::info!(category = %category.name, by = %user.username, "Category deleted");

    Ok(ok_with_message(category, "Category deleted"))
}
