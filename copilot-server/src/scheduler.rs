//! Background expiry sweep of the credential cache.

use copilot_core::modules::credential_store::RETENTION_HORIZON;
use copilot_core::CredentialStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Run one sweep and log the outcome. Failures are logged, never fatal.
pub async fn sweep_once(store: &dyn CredentialStore) -> usize {
    match store.sweep_expired(RETENTION_HORIZON).await {
        Ok(0) => 0,
        Ok(removed) => {
            info!("Swept {} stale credential(s) from the {} cache", removed, store.backend_name());
            removed
        },
        Err(e) => {
            warn!("Credential sweep failed ({}): {}", store.backend_name(), e);
            0
        },
    }
}

/// Sweep every `interval_secs`; the first sweep runs one interval after start.
pub fn spawn_sweep_task(store: Arc<dyn CredentialStore>, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweep_once(store.as_ref()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use copilot_core::modules::credential_store::MemoryCredentialStore;
    use copilot_core::CredentialPatch;

    #[tokio::test]
    async fn test_sweep_once_removes_stale_records() {
        let store = MemoryCredentialStore::new();
        let now = chrono::Utc::now().timestamp();
        store.upsert("old", &CredentialPatch::touch(now - 8 * 24 * 3600)).await.unwrap();
        store.upsert("new", &CredentialPatch::touch(now)).await.unwrap();

        assert_eq!(sweep_once(&store).await, 1);
        assert!(store.get("new").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_sweep_runs() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.upsert("old", &CredentialPatch::touch(1)).await.unwrap();

        let handle = spawn_sweep_task(Arc::clone(&store) as Arc<dyn CredentialStore>, 60);
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert!(store.get("old").await.unwrap().is_none());
        handle.abort();
    }
}
