//! Checkout API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkouts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::history).post(handler::finalize))
        .route("/preview/{pin_id}", get(handler::preview))
        .route("/{id}", get(handler::get_by_id))
}
