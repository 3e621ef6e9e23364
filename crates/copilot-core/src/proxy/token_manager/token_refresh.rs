use copilot_types::{CredentialPatch, ProxyError};

use super::{AuthorizedSession, TokenManager};
use crate::modules::credential_store::mask_credential;

impl TokenManager {
    /// Resolve the upstream token and session headers for a client credential.
    ///
    /// At most one exchange per call. No store lock is held across the network
    /// round trip; only the final write of the fetched token touches the store.
    pub async fn authorize(&self, client_credential: &str) -> Result<AuthorizedSession, ProxyError> {
        if client_credential.is_empty() {
            return Err(ProxyError::Unauthenticated);
        }

        self.refresh_if_needed(client_credential).await?;

        let record =
            self.ensure_fresh(client_credential).await.ok_or(ProxyError::Unauthenticated)?;
        if !record.is_authorized() {
            return Err(ProxyError::Unauthenticated);
        }

        Ok(AuthorizedSession {
            upstream_token: record.upstream_token,
            device_identifier: record.device_identifier,
            session_identifier: record.session_identifier,
        })
    }

    /// Exchange the credential when the cached token is missing or expires
    /// within the jittered margin. A failed exchange writes nothing.
    pub(super) async fn refresh_if_needed(&self, client_credential: &str) -> Result<(), ProxyError> {
        let now = self.now();
        let margin = self.jitter.refresh_margin_secs();

        let cached = self.store.lookup(client_credential).await;
        if cached.as_ref().is_some_and(|r| r.token_valid_beyond(now, margin)) {
            return Ok(());
        }

        let masked = mask_credential(client_credential);
        tracing::debug!("Upstream token for {} missing or expiring, exchanging", masked);

        let issued = self.exchange.exchange(client_credential).await?;

        // A zero or past expiry would never count as valid and force an exchange per request.
        let now = self.now();
        if issued.expires_at <= now {
            tracing::error!(
                "Token exchange for {} returned an unusable expiry {} (now {})",
                masked,
                issued.expires_at,
                now
            );
            return Err(ProxyError::ExchangeFailed {
                status: 500,
                body: format!("Token exchange returned an expired token (expires_at={})", issued.expires_at),
            });
        }

        let patch = CredentialPatch::token(issued.token, issued.expires_at, now);
        if let Err(e) = self.store.upsert(client_credential, &patch).await {
            // The following re-read reports the credential as unauthenticated.
            tracing::error!(
                "Failed to cache upstream token for {}: {}",
                masked,
                ProxyError::from(e)
            );
        }
        Ok(())
    }
}
