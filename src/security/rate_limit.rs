//! Global token-bucket rate limiting
//!
//! One bucket guards the whole process: it holds `n` tokens and refills at
//! `n` per second. Requests that find it empty are rejected straight away.

use std::{num::NonZeroU32, sync::Arc};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use tracing::debug;

use crate::config::DEFAULT_RATE_LIMIT;
use crate::error::GatewayError;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared limiter handle used as middleware state
pub type SharedRateLimiter = Arc<RateLimiter>;

pub struct RateLimiter {
    inner: DirectLimiter,
    requests_per_second: u32,
}

impl RateLimiter {
    /// Bucket with burst size and per-second refill both equal to `requests_per_second`
    pub fn new(requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second)
            .or(NonZeroU32::new(DEFAULT_RATE_LIMIT))
            .unwrap_or(NonZeroU32::MIN);

        Self {
            inner: DirectLimiter::direct(Quota::per_second(rate)),
            requests_per_second: rate.get(),
        }
    }

    /// Take one token if available
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }

    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
    }
}

/// Reject with 429 when the bucket is empty, otherwise forward
pub async fn rate_limit_middleware(
    State(limiter): State<SharedRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.try_acquire() {
        debug!("Rate limit exceeded for {} {}", request.method(), request.uri().path());
        return GatewayError::RateLimited.into_response();
    }
    next.run(request).await
}
