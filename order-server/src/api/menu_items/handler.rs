//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::ApiResponse;
use shared::models::{MenuItemCreate, MenuItemUpdate, MenuListQuery};
use surrealdb::RecordId;
use validator::Validate;

use crate::auth::{Capability, CurrentUser, OptionalUser};
use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::menu_item::MenuItemFields;
use crate::db::repository::{CategoryRepository, MenuItemRepository, RepoError};
use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// Resolve a category id that must point at a live category
async fn live_category(state: &ServerState, id: &str) -> AppResult<RecordId> {
    let rid = CategoryRepository::record_id(id)?;
    CategoryRepository::new(state.get_db())
        .find_live(&rid)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::not_found(format!("Category {} not found", id)),
            other => other.into(),
        })?;
    Ok(rid)
}

/// GET /api/menu-items - 菜单列表 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MenuListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let include_hidden = query.include_hidden && user.can(Capability::ViewHiddenMenu);
    let category = query
        .category_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CategoryRepository::record_id)
        .transpose()?;

    let repo = MenuItemRepository::new(state.get_db());
    Ok(ok(repo.find_all(include_hidden, category).await?))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.find_live(&MenuItemRepository::record_id(&id)?).await?;
    if !item.is_visible && !user.can(Capability::ViewHiddenMenu) {
        return Err(AppError::not_found(format!("Menu item {} not found", id)));
    }
    Ok(ok(item))
}

/// POST /api/menu-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<ApiResponse<MenuItem>>)> {
    user.require(Capability::ManageMenu)?;
    payload.validate()?;

    let category = live_category(&state, &payload.category_id).await?;
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .create(MenuItemFields {
            name: payload.name.trim().to_string(),
            category,
            price: payload.price,
            description: payload.description,
            image: payload.image,
            is_visible: payload.is_visible.unwrap_or(true),
        })
        .await?;
    tracing::info!(menu_item = %item.name, price = item.price, by = %user.username, "Menu item created");

    Ok((StatusCode::CREATED, ok_with_message(item, "Menu item created")))
}

/// PUT /api/menu-items/{id} - 更新菜品
///
/// 员工只能修改上下架 (`is_visible`)，其他字段需要管理员。
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let rid = MenuItemRepository::record_id(&id)?;

    if payload.is_visibility_only() && !user.can(Capability::ManageMenu) {
        user.require(Capability::ToggleMenuVisibility)?;
        let item = match payload.is_visible {
            Some(visible) => repo.set_visibility(&rid, visible).await?,
            None => repo.find_live(&rid).await?,
        };
        return Ok(ok_with_message(item, "Menu item updated"));
    }

    user.require(Capability::ManageMenu)?;
    payload.validate()?;

    let mut fields = MenuItemFields::from(repo.find_live(&rid).await?);
    if let Some(name) = payload.name {
        fields.name = name.trim().to_string();
    }
    if let Some(category_id) = payload.category_id.as_deref() {
        fields.category = live_category(&state, category_id).await?;
    }
    if let Some(price) = payload.price {
        fields.price = price;
    }
    if payload.description.is_some() {
        fields.description = payload.description;
    }
    if payload.image.is_some() {
        fields.image = payload.image;
    }
    if let Some(visible) = payload.is_visible {
        fields.is_visible = visible;
    }

    let item = repo.update(&rid, fields).await?;
    Ok(ok_with_message(item, "Menu item updated"))
}

/// PATCH /api/menu-items/{id}/toggle-visibility
pub async fn toggle_visibility(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    user.require(Capability::ToggleMenuVisibility)?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .toggle_visibility(&MenuItemRepository::record_id(&id)?)
        .await?;
    Ok(ok_with_message(item, "Visibility updated"))
}

/// DELETE /api/menu-items/{id} - 软删除
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    user.require(Capability::ManageMenu)?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.soft_delete(&MenuItemRepository::record_id(&id)?).await?;
    tracing::info!(menu_item = %item.name, by = %user.username, "Menu item deleted");

    Ok(ok_with_message(item, "Menu item deleted"))
}
