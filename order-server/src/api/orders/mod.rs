//! Order API 模块
//!
//! `POST /api/orders` 按客户端 IP 限流。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::order_rate_limit;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let place_routes = Router::new()
        .route("/", post(handler::place))
        .layer(middleware::from_fn_with_state(state.clone(), order_rate_limit));

    let routes = Router::new()
        .route("/", get(handler::list))
        .route("/pin/{code}", get(handler::by_pin))
        .route("/{id}", axum::routing::delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status));

    place_routes.merge(routes)
}
