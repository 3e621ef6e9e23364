mod store_failure_tests;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use copilot_types::ProxyError;
use parking_lot::Mutex;

use super::{FixedJitter, TokenManager};
use crate::modules::credential_store::{CredentialStore, MemoryCredentialStore};
use crate::proxy::common::ManualClock;
use crate::proxy::upstream::{ExchangedToken, TokenExchange};

pub(super) const START: i64 = 1_700_000_000;

/// Exchange double that returns a scripted outcome and counts calls.
pub(super) struct FakeExchange {
    outcome: Mutex<Result<ExchangedToken, ProxyError>>,
    calls: AtomicUsize,
}

impl FakeExchange {
    pub(super) fn issuing(token: &str, expires_at: i64) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Ok(ExchangedToken { token: token.to_string(), expires_at })),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(Err(ProxyError::ExchangeFailed { status, body: body.to_string() })),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn set_outcome(&self, outcome: Result<ExchangedToken, ProxyError>) {
        *self.outcome.lock() = outcome;
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for FakeExchange {
    async fn exchange(&self, _client_credential: &str) -> Result<ExchangedToken, ProxyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.lock().clone()
    }
}

pub(super) struct Harness {
    pub manager: TokenManager,
    pub store: Arc<MemoryCredentialStore>,
    pub exchange: Arc<FakeExchange>,
    pub clock: Arc<ManualClock>,
}

pub(super) fn harness(exchange: Arc<FakeExchange>) -> Harness {
    let store = Arc::new(MemoryCredentialStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let manager = TokenManager::new(
        Arc::clone(&store) as Arc<dyn CredentialStore>,
        Arc::clone(&exchange) as Arc<dyn TokenExchange>,
    )
    .with_jitter(Arc::new(FixedJitter(600)))
    .with_clock(Arc::clone(&clock) as Arc<dyn crate::proxy::common::Clock>);
    Harness { manager, store, exchange, clock }
}
