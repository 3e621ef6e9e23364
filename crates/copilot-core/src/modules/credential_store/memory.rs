use async_trait::async_trait;
use copilot_types::{CredentialPatch, CredentialRecord, StoreResult};
use dashmap::DashMap;

use super::CredentialStore;

/// Transient backend: a sharded map, one shard lock held per operation.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: DashMap<String, CredentialRecord>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, client_credential: &str) -> StoreResult<Option<CredentialRecord>> {
        Ok(self.records.get(client_credential).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, client_credential: &str, patch: &CredentialPatch) -> StoreResult<()> {
        self.records
            .entry(client_credential.to_string())
            .and_modify(|record| record.apply(patch))
            .or_insert_with(|| {
                let mut record = CredentialRecord::new(client_credential);
                record.apply(patch);
                record
            });
        Ok(())
    }

    async fn update(
        &self,
        client_credential: &str,
        patch: &CredentialPatch,
    ) -> StoreResult<bool> {
        match self.records.get_mut(client_credential) {
            Some(mut record) => {
                record.apply(patch);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn delete(&self, client_credential: &str) -> StoreResult<()> {
        self.records.remove(client_credential);
        Ok(())
    }

    async fn sweep_touched_before(&self, cutoff: i64) -> StoreResult<Vec<String>> {
        let mut removed = Vec::new();
        self.records.retain(|key, record| {
            if record.last_touched_at < cutoff {
                removed.push(key.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
