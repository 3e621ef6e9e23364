//! Global request rate limit for the API routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Token bucket shared by every caller: a burst of `per_minute` requests,
/// replenished at `per_minute` per minute (one cell every `60 / per_minute`
/// seconds), not at a single request per minute.
pub struct GlobalRateLimiter {
    limiter: DefaultDirectRateLimiter,
    per_minute: u32,
}

impl GlobalRateLimiter {
    /// `None` when `per_minute` is 0 (unlimited).
    pub fn per_minute(per_minute: u32) -> Option<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute)?);
        Some(Self { limiter: RateLimiter::direct(quota), per_minute })
    }

    pub fn limit(&self) -> u32 {
        self.per_minute
    }

    pub fn check(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

pub async fn rate_limit_middleware(
    State(limiter): State<Option<Arc<GlobalRateLimiter>>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(limiter) = limiter {
        if !limiter.check() {
            tracing::warn!(
                "Rate limit of {}/min exceeded: {} {}",
                limiter.limit(),
                request.method(),
                request.uri().path()
            );
            return (StatusCode::TOO_MANY_REQUESTS, Json(json!({"message": "too many requests"})))
                .into_response();
        }
    }
    next.run(request).await
}
