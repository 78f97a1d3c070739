//! Fixed-window rate limiting per (client IP, endpoint).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::http::error::ApiError;
use crate::observability::metrics;

/// Counter for one key within the current window.
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

/// Outcome of [`RateLimiter::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny { retry_after_secs: u64 },
}

/// Fixed-window counter keyed by client and endpoint.
///
/// Windows live for the lifetime of the process. The reset, check and
/// increment for a key all happen while holding that key's map entry, so
/// concurrent requests cannot exceed `max_requests` in a window.
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    /// Build the limiter key for a client and request path.
    pub fn key(ip: &str, endpoint: &str) -> String {
        format!("{ip}-{endpoint}")
    }

    pub fn admit(&self, key: &str) -> Admission {
        self.admit_at(key, Instant::now())
    }

    /// Admit a request observed at `now`.
    pub fn admit_at(&self, key: &str, now: Instant) -> Admission {
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(RateWindow {
                count: 0,
                window_start: now,
            });
        let window = entry.value_mut();

        // Exactly `window` after the start still belongs to the old window.
        if now.saturating_duration_since(window.window_start) > self.window {
            window.count = 0;
            window.window_start = now;
        }

        if window.count >= self.max_requests {
            let remaining = (window.window_start + self.window).saturating_duration_since(now);
            return Admission::Deny {
                retry_after_secs: ceil_secs(remaining).max(1),
            };
        }

        window.count += 1;
        Admission::Allow
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let millis = duration.as_millis() as u64;
    millis.div_ceil(1000)
}

/// Client IP: first `X-Forwarded-For` hop, else the peer address.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware applying the limiter to every `/api/` request.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with("/api/") {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(request.headers(), peer);
    let key = RateLimiter::key(&ip, &path);

    match limiter.admit(&key) {
        Admission::Allow => next.run(request).await,
        Admission::Deny { retry_after_secs } => {
            tracing::warn!(client = %ip, endpoint = %path, retry_after_secs, "Rate limit exceeded");
            metrics::record_rate_limited(&path);
            ApiError::RateLimited { retry_after_secs }.into_response()
        }
    }
}
