//! Fixed-window rate limiting for customer order submission

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::AppError;
use crate::core::ServerState;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// IP -> entry
    entries: Arc<DashMap<String, IpEntry>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub fn check(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.entries.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }

    /// Drop entries whose window has long passed
    pub fn cleanup(&self) {
        let now = Instant::now();
        let cutoff = self.window * 5;
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
    }

    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }
}

/// Extract client IP. X-Forwarded-For 仅在 `trust_proxy` 时采用，否则取对端地址。
fn extract_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
    {
        // X-Forwarded-For can be comma-separated; first entry is the original client
        if let Some(first) = val.split(',').next() {
            let ip = first.trim();
            if !ip.is_empty() {
                return ip.to_owned();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Rate limit middleware for `POST /api/orders`
pub async fn order_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_ip(&request, state.config.trust_proxy);
    if !state.rate_limiter().check(&ip) {
        tracing::warn!(target: "security", ip = %ip, "Order rate limit exceeded");
        return AppError::TooManyRequests.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn limits_per_window() {
        let limiter = RateLimiter::new(5, 60);
        for _ in 0..5 {
            assert!(limiter.check("10.0.0.1"));
        }
        assert!(!limiter.check("10.0.0.1"));
        // Other clients are unaffected
        assert!(limiter.check("10.0.0.2"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.check("10.0.0.1"));
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new(5, 60);
        limiter.check("10.0.0.1");
        tokio::time::advance(Duration::from_secs(301)).await;
        limiter.cleanup();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    fn forwarded_request() -> Request {
        let mut request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 40000))));
        request
    }

    #[test]
    fn forwarded_header_ignored_without_trusted_proxy() {
        assert_eq!(extract_ip(&forwarded_request(), false), "192.168.1.20");
    }

    #[test]
    fn forwarded_header_used_behind_trusted_proxy() {
        assert_eq!(extract_ip(&forwarded_request(), true), "203.0.113.9");
    }

    #[test]
    fn missing_peer_falls_back_to_unknown() {
        let request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.9")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request, false), "unknown");
    }
}
