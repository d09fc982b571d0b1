//! Per-client-address request limiter for the API surface.
//!
//! Fixed-window counters keyed by client IP; the only shared mutable state
//! in the process. Counter accuracy only needs to be eventual, so a single
//! mutex-guarded map is enough.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::time::Instant;
use tracing::warn;

use super::models::ErrorResponse;
use super::state::AppState;
use crate::config::RateLimitConfig;

pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

struct Bucket {
    window_start: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `addr`; returns false when the address has
    /// exhausted its window. The counter resets once the window elapses.
    pub fn try_acquire(&self, addr: IpAddr) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().expect("rate limiter poisoned");

        // Expired windows are dropped wholesale, the current address's
        // included, so the map stays bounded by the number of distinct
        // addresses seen within one window.
        buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < self.window);

        let bucket = buckets.entry(addr).or_insert(Bucket {
            window_start: now,
            count: 0,
        });

        if bucket.count >= self.max_requests {
            return false;
        }

        bucket.count += 1;
        true
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.buckets.lock().expect("rate limiter poisoned").len()
    }
}

/// Axum middleware guarding the `/api` namespace.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if state.limiter.try_acquire(addr) {
        return next.run(request).await;
    }

    state.metrics.request_limited();
    warn!(client = %addr, "Request rejected by rate limiter");

    let body = ErrorResponse {
        status: "error",
        code: "RATE_LIMITED",
        message: state.config.rate_limit.message.clone(),
        suggestion: None,
        details: None,
    };

    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            window_secs,
            max_requests,
            message: "limited".to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_after_limit_and_resets_after_window() {
        let limiter = limiter(3, 60);
        let addr: IpAddr = "10.0.0.1".parse().unwrap();

        for _ in 0..3 {
            assert!(limiter.try_acquire(addr));
        }
        assert!(!limiter.try_acquire(addr));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.try_acquire(addr));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_buckets_are_pruned_from_the_map() {
        let limiter = limiter(5, 60);
        for i in 0..100u16 {
            let addr = IpAddr::V4(Ipv4Addr::new(10, 0, (i >> 8) as u8, i as u8));
            assert!(limiter.try_acquire(addr));
        }
        assert_eq!(limiter.bucket_count(), 100);

        tokio::time::advance(Duration::from_secs(61)).await;

        // One fresh request sweeps every expired entry.
        assert!(limiter.try_acquire("192.168.0.1".parse().unwrap()));
        assert_eq!(limiter.bucket_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn addresses_are_counted_independently() {
        let limiter = limiter(1, 60);
        let first: IpAddr = "10.0.0.1".parse().unwrap();
        let second: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.try_acquire(first));
        assert!(!limiter.try_acquire(first));
        assert!(limiter.try_acquire(second));
    }
}
