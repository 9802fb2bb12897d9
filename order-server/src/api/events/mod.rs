//! 订单通知流 (Server-Sent Events)
//!
//! 每个订阅者一个 broadcast receiver；落后太多时丢弃旧消息继续推送。

use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::{Capability, CurrentUser};
use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(stream))
}

/// GET /api/events
async fn stream(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    user.require(Capability::ViewAllOrders)?;

    let rx = state.message_bus().subscribe();
    tracing::debug!(user = %user.username, "Notification stream opened");

    let events = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(notification) => match Event::default()
                    .event(notification.event.as_str())
                    .json_data(&notification)
                {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(e) => tracing::warn!(error = %e, "Failed to encode notification"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
