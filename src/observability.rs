//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters/gauges
#[derive(Debug, Default)]
pub struct Metrics {
    info_served: AtomicU64,
    downloads_started: AtomicU64,
    downloads_failed: AtomicU64,
    requests_limited: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info_served(&self) {
        self.info_served.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "info_served", "Metric incremented");
    }

    pub fn download_started(&self) {
        self.downloads_started.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloads_started", "Metric incremented");
    }

    pub fn download_failed(&self) {
        self.downloads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "downloads_failed", "Metric incremented");
    }

    pub fn request_limited(&self) {
        self.requests_limited.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "requests_limited", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            info_served: self.info_served.load(Ordering::Relaxed),
            downloads_started: self.downloads_started.load(Ordering::Relaxed),
            downloads_failed: self.downloads_failed.load(Ordering::Relaxed),
            requests_limited: self.requests_limited.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub info_served: u64,
    pub downloads_started: u64,
    pub downloads_failed: u64,
    pub requests_limited: u64,
}
