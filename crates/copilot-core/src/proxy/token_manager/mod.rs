//! Authorization state per client credential.
//!
//! [`TokenManager::authorize`] is the single entry point used by the handlers:
//! it refreshes the upstream token when it is missing or close to expiry, then
//! runs [`TokenManager::ensure_fresh`] to rotate the session identifier and
//! touch the record.

use std::sync::Arc;

use crate::modules::credential_store::CredentialStore;
use crate::proxy::common::{Clock, SystemClock};
use crate::proxy::upstream::TokenExchange;

mod jitter;
mod session;
mod token_refresh;

#[cfg(test)]
mod tests;

pub use jitter::{FixedJitter, JitterSource, RandomJitter};

/// Lifetime of a session identifier before it is rotated.
pub const SESSION_TTL_SECS: i64 = 15 * 60;

/// What the upstream client needs to build outbound headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedSession {
    pub upstream_token: String,
    pub device_identifier: String,
    pub session_identifier: String,
}

pub struct TokenManager {
    store: Arc<dyn CredentialStore>,
    exchange: Arc<dyn TokenExchange>,
    jitter: Arc<dyn JitterSource>,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn CredentialStore>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self { store, exchange, jitter: Arc::new(RandomJitter), clock: Arc::new(SystemClock) }
    }

    /// Replace the refresh-margin source (deterministic refresh decisions in tests).
    #[must_use]
    pub fn with_jitter(mut self, jitter: Arc<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> i64 {
        self.clock.now()
    }
}
