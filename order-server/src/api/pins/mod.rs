//! PIN Session API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/pins/pin/{code} | GET | 顾客查 PIN | 无 |
//! | /api/pins | GET / POST | 会话列表 / 开台 | 员工 |
//! | /api/pins/active | GET | 进行中的会话 | 员工 |
//! | /api/pins/{id}/close | PATCH | 关台 | 员工 |
//! | /api/pins/{id}/paid | PATCH | 标记已付款 | 员工 |

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/pins", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/active", get(handler::list_active))
        .route("/pin/{code}", get(handler::lookup))
        .route("/{id}/close", patch(handler::close))
        .route("/{id}/paid", patch(handler::mark_paid))
}
