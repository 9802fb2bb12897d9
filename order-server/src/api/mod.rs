//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台管理接口
//! - [`categories`] - 分类管理接口
//! - [`menu_items`] - 菜单管理接口
//! - [`pins`] - PIN 会话接口
//! - [`orders`] - 订单接口 (下单限流)
//! - [`checkouts`] - 结账接口
//! - [`events`] - 订单通知流 (SSE)

pub mod health;

// Directory
pub mod categories;
pub mod menu_items;
pub mod tables;

// Core workflow
pub mod checkouts;
pub mod orders;
pub mod pins;

// Notifications
pub mod events;

use axum::Router;
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// Build a router with all routes registered (no tower middleware)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Directory API - public reads, staff writes
        .merge(tables::router())
        .merge(categories::router())
        .merge(menu_items::router())
        // Session / order / checkout API
        .merge(pins::router())
        .merge(orders::router(state))
        .merge(checkouts::router())
        // Notification stream - staff
        .merge(events::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by the HTTP server and by tests (`tower::ServiceExt::oneshot`)
pub fn build_app(state: ServerState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());
    build_router(&state)
        // CORS - Handle cross-origin requests
        .layer(cors)
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS_ORIGIN, allowing any origin");
            CorsLayer::permissive()
        }
    }
}
