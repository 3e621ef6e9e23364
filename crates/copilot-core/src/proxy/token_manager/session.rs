use copilot_types::{CredentialPatch, CredentialRecord, ProxyError};

use super::{TokenManager, SESSION_TTL_SECS};
use crate::modules::credential_store::mask_credential;
use crate::proxy::common::random_id::{generate_device_id, generate_session_id};

impl TokenManager {
    /// Touch the record, rotating the session identifier when expired and
    /// minting the device identifier when missing.
    ///
    /// Returns the post-write record as stored, or `None` when the credential is
    /// unknown or the store could not confirm the write.
    pub async fn ensure_fresh(&self, client_credential: &str) -> Option<CredentialRecord> {
        let masked = mask_credential(client_credential);
        let record = self.store.lookup(client_credential).await?;
        let now = self.now();

        let mut patch = CredentialPatch::touch(now);
        if record.session_expired(now) {
            patch = patch.with_session(generate_session_id(), now + SESSION_TTL_SECS);
            tracing::debug!("Rotating session identifier for {}", masked);
        }
        if record.device_identifier.is_empty() {
            patch = patch.with_device(generate_device_id());
            tracing::debug!("Generating device identifier for {}", masked);
        }

        match self.store.update(client_credential, &patch).await {
            Ok(true) => {},
            Ok(false) => {
                tracing::debug!("Credential {} was removed before it could be touched", masked);
                return None;
            },
            Err(e) => {
                tracing::warn!("Failed to touch credential {}: {}", masked, ProxyError::from(e));
                return None;
            },
        }

        self.store.lookup(client_credential).await
    }
}
