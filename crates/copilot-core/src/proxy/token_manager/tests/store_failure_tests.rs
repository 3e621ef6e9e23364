use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use copilot_types::{CredentialPatch, CredentialRecord, ProxyError, StoreError, StoreResult};

use super::{FakeExchange, START};
use crate::modules::credential_store::{CredentialStore, MemoryCredentialStore};
use crate::proxy::common::{Clock, ManualClock};
use crate::proxy::token_manager::{FixedJitter, TokenManager};
use crate::proxy::upstream::TokenExchange;

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryCredentialStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

fn database_error() -> StoreError {
    StoreError::Database { message: "database is locked".to_string() }
}

impl FlakyStore {
    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(database_error())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for FlakyStore {
    async fn get(&self, client_credential: &str) -> StoreResult<Option<CredentialRecord>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(client_credential).await
    }

    async fn upsert(&self, client_credential: &str, patch: &CredentialPatch) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.upsert(client_credential, patch).await
    }

    async fn update(&self, client_credential: &str, patch: &CredentialPatch) -> StoreResult<bool> {
        Self::check(&self.fail_writes)?;
        self.inner.update(client_credential, patch).await
    }

    async fn delete(&self, client_credential: &str) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.delete(client_credential).await
    }

    async fn sweep_touched_before(&self, cutoff: i64) -> StoreResult<Vec<String>> {
        Self::check(&self.fail_writes)?;
        self.inner.sweep_touched_before(cutoff).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

fn manager(store: &Arc<FlakyStore>, exchange: &Arc<FakeExchange>) -> TokenManager {
    TokenManager::new(
        Arc::clone(store) as Arc<dyn CredentialStore>,
        Arc::clone(exchange) as Arc<dyn TokenExchange>,
    )
    .with_jitter(Arc::new(FixedJitter(600)))
    .with_clock(Arc::new(ManualClock::new(START)) as Arc<dyn Clock>)
}

#[tokio::test]
async fn test_unavailable_store_yields_unauthenticated() {
    let store = Arc::new(FlakyStore::default());
    store.fail_reads.store(true, Ordering::SeqCst);
    store.fail_writes.store(true, Ordering::SeqCst);
    let exchange = FakeExchange::issuing("tok1", START + 1800);

    let result = manager(&store, &exchange).authorize("abc").await;

    assert_eq!(result.unwrap_err(), ProxyError::Unauthenticated);
    assert_eq!(exchange.calls(), 1, "read failure is treated as a cache miss");
}

#[tokio::test]
async fn test_failed_token_write_yields_unauthenticated() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes.store(true, Ordering::SeqCst);
    let exchange = FakeExchange::issuing("tok1", START + 1800);

    let result = manager(&store, &exchange).authorize("abc").await;

    assert_eq!(result.unwrap_err(), ProxyError::Unauthenticated);
    assert!(store.inner.get("abc").await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_touch_yields_unauthenticated() {
    let store = Arc::new(FlakyStore::default());
    store
        .inner
        .upsert("abc", &CredentialPatch::token("tok1", START + 1800, START))
        .await
        .unwrap();
    store.fail_writes.store(true, Ordering::SeqCst);
    let exchange = FakeExchange::issuing("tok2", START + 1800);

    let result = manager(&store, &exchange).authorize("abc").await;

    assert_eq!(result.unwrap_err(), ProxyError::Unauthenticated);
    assert_eq!(exchange.calls(), 0, "cached token was still valid");
    let stored = store.inner.get("abc").await.unwrap().unwrap();
    assert!(stored.session_identifier.is_empty(), "failed touch leaves the record as it was");
}

#[tokio::test]
async fn test_store_recovers_after_transient_failure() {
    let store = Arc::new(FlakyStore::default());
    store.fail_reads.store(true, Ordering::SeqCst);
    let exchange = FakeExchange::issuing("tok1", START + 1800);
    let manager = manager(&store, &exchange);

    assert!(manager.authorize("abc").await.is_err());

    store.fail_reads.store(false, Ordering::SeqCst);
    let session = manager.authorize("abc").await.unwrap();
    assert_eq!(session.upstream_token, "tok1");
}
