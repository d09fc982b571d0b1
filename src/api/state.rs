use std::sync::Arc;

use super::ratelimit::RateLimiter;
use crate::config::Config;
use crate::observability::Metrics;
use crate::provider::VideoProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn VideoProvider>,
    pub limiter: Arc<RateLimiter>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn VideoProvider>) -> Self {
        let limiter = RateLimiter::new(&config.rate_limit);
        Self {
            config: Arc::new(config),
            provider,
            limiter: Arc::new(limiter),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
