//! Credential store abstraction.
//!
//! One keyed record per client credential, with atomic per-key partial updates.
//! Two backends implement the same contract; which one is active is decided once
//! at startup by [`open_credential_store`] and only changes durability.

mod memory;
mod sqlite;


pub use memory::MemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

use async_trait::async_trait;
use copilot_types::{
    CredentialPatch, CredentialRecord, GatewayConfig, ProxyError, StorageBackend, StoreResult,
};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppResult;

/// Records untouched for this long are removed by the sweep.
pub const RETENTION_HORIZON: Duration = Duration::from_secs(60 * 60 * 24 * 7);

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a record. Never touches the network.
    async fn get(&self, client_credential: &str) -> StoreResult<Option<CredentialRecord>>;

    /// Create the record if absent, otherwise merge the non-empty fields of `patch`.
    async fn upsert(&self, client_credential: &str, patch: &CredentialPatch) -> StoreResult<()>;

    /// Merge `patch` into an existing record only. Returns `false` when the record
    /// is gone, so a concurrent delete is never undone by a touch.
    async fn update(&self, client_credential: &str, patch: &CredentialPatch)
        -> StoreResult<bool>;

    /// Remove a record. Deleting an absent key is not an error.
    async fn delete(&self, client_credential: &str) -> StoreResult<()>;

    /// Delete every record with `last_touched_at < cutoff`, returning the removed keys.
    async fn sweep_touched_before(&self, cutoff: i64) -> StoreResult<Vec<String>>;

    fn backend_name(&self) -> &'static str;

    /// Read with storage errors degraded to a miss.
    async fn lookup(&self, client_credential: &str) -> Option<CredentialRecord> {
        match self.get(client_credential).await {
            Ok(record) => record,
            Err(e) => {
                let degraded = ProxyError::from(e);
                tracing::warn!(
                    "Credential lookup failed for {} ({}), treating as a miss: {}",
                    mask_credential(client_credential),
                    self.backend_name(),
                    degraded
                );
                None
            },
        }
    }

    /// Delete every record not touched within `horizon` of now.
    async fn sweep_expired(&self, horizon: Duration) -> StoreResult<usize> {
        let horizon_secs = i64::try_from(horizon.as_secs()).unwrap_or(i64::MAX);
        let cutoff = chrono::Utc::now().timestamp().saturating_sub(horizon_secs);
        let removed = self.sweep_touched_before(cutoff).await?;
        for key in &removed {
            tracing::debug!(
                "Swept credential {}: not touched for over {}s",
                mask_credential(key),
                horizon_secs
            );
        }
        Ok(removed.len())
    }
}

/// Open the backend selected by `config`.
pub async fn open_credential_store(config: &GatewayConfig) -> AppResult<Arc<dyn CredentialStore>> {
    match config.storage_backend() {
        StorageBackend::Sqlite(path) => {
            let store = SqliteCredentialStore::open(&path).await?;
            tracing::info!("Credential cache: SQLite at {}", path.display());
            Ok(Arc::new(store))
        },
        StorageBackend::Memory => {
            tracing::info!("Credential cache: in-memory (not persisted across restarts)");
            Ok(Arc::new(MemoryCredentialStore::new()))
        },
    }
}

/// Short, log-safe rendering of a credential.
pub fn mask_credential(credential: &str) -> String {
    let prefix: String = credential.chars().take(6).collect();
    format!("{}***", prefix)
}
