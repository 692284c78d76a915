//! Request admission: input validation and global rate limiting

pub mod rate_limit;
pub mod validation;

use std::sync::Arc;

use rate_limit::{RateLimiter, SharedRateLimiter};
use validation::InputValidator;

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub rate_limit_max: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit_max: crate::config::DEFAULT_RATE_LIMIT,
        }
    }
}

pub struct SecurityProvider {
    rate_limiter: SharedRateLimiter,
    validator: InputValidator,
}

impl SecurityProvider {
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_max)),
            validator: InputValidator,
        }
    }

    pub fn rate_limiter(&self) -> SharedRateLimiter {
        self.rate_limiter.clone()
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }
}

pub use rate_limit::rate_limit_middleware;
