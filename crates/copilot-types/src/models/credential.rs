//! Cached authorization state per client credential.
//!
//! One [`CredentialRecord`] exists per long-lived client credential. Writes go
//! through [`CredentialPatch`], where an absent, empty or zero field means
//! "leave the stored value alone".

use serde::{Deserialize, Serialize};

/// Authorization and session state cached for one client credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Primary key; never mutated after creation.
    pub client_credential: String,
    /// Short-lived upstream access token; empty until the first exchange.
    pub upstream_token: String,
    /// Unix seconds; 0 means never fetched.
    pub upstream_token_expires_at: i64,
    /// Stable per credential once generated.
    pub device_identifier: String,
    /// Rotates on its own clock, independent of the upstream token.
    pub session_identifier: String,
    /// Unix seconds at which the session identifier must rotate.
    pub session_expires_at: i64,
    /// Unix seconds of the last successful read.
    pub last_touched_at: i64,
}

impl CredentialRecord {
    /// Empty record for a credential seen for the first time.
    pub fn new(client_credential: impl Into<String>) -> Self {
        Self { client_credential: client_credential.into(), ..Self::default() }
    }

    /// A record without an upstream token is a cache miss.
    pub fn is_authorized(&self) -> bool {
        !self.upstream_token.is_empty()
    }

    /// True when the token stays valid past `now + margin_secs`.
    pub fn token_valid_beyond(&self, now: i64, margin_secs: i64) -> bool {
        self.is_authorized() && self.upstream_token_expires_at > now.saturating_add(margin_secs)
    }

    pub fn session_expired(&self, now: i64) -> bool {
        self.session_expires_at < now
    }

    /// Merge a partial update into this record.
    ///
    /// Empty strings and zero timestamps are ignored. The device identifier is
    /// write-once: a stored non-empty value is never replaced.
    pub fn apply(&mut self, patch: &CredentialPatch) {
        if let Some(token) = patch.upstream_token.as_deref().filter(|t| !t.is_empty()) {
            self.upstream_token = token.to_string();
        }
        if let Some(expires_at) = patch.upstream_token_expires_at.filter(|v| *v != 0) {
            self.upstream_token_expires_at = expires_at;
        }
        if self.device_identifier.is_empty() {
            if let Some(device) = patch.device_identifier.as_deref().filter(|d| !d.is_empty()) {
                self.device_identifier = device.to_string();
            }
        }
        if let Some(session) = patch.session_identifier.as_deref().filter(|s| !s.is_empty()) {
            self.session_identifier = session.to_string();
        }
        if let Some(expires_at) = patch.session_expires_at.filter(|v| *v != 0) {
            self.session_expires_at = expires_at;
        }
        if let Some(touched) = patch.last_touched_at.filter(|v| *v != 0) {
            self.last_touched_at = touched;
        }
    }
}

/// Partial update for a [`CredentialRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialPatch {
    pub upstream_token: Option<String>,
    pub upstream_token_expires_at: Option<i64>,
    pub device_identifier: Option<String>,
    pub session_identifier: Option<String>,
    pub session_expires_at: Option<i64>,
    pub last_touched_at: Option<i64>,
}

impl CredentialPatch {
    /// Patch that only refreshes `last_touched_at`.
    pub fn touch(now: i64) -> Self {
        Self { last_touched_at: Some(now), ..Self::default() }
    }

    /// Patch carrying a freshly exchanged upstream token.
    pub fn token(token: impl Into<String>, expires_at: i64, now: i64) -> Self {
        Self {
            upstream_token: Some(token.into()),
            upstream_token_expires_at: Some(expires_at),
            last_touched_at: Some(now),
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session_identifier: String, expires_at: i64) -> Self {
        self.session_identifier = Some(session_identifier);
        self.session_expires_at = Some(expires_at);
        self
    }

    pub fn with_device(mut self, device_identifier: String) -> Self {
        self.device_identifier = Some(device_identifier);
        self
    }

    /// True when applying this patch cannot change anything.
    pub fn is_empty(&self) -> bool {
        self.upstream_token.as_deref().map_or(true, str::is_empty)
            && self.upstream_token_expires_at.map_or(true, |v| v == 0)
            && self.device_identifier.as_deref().map_or(true, str::is_empty)
            && self.session_identifier.as_deref().map_or(true, str::is_empty)
            && self.session_expires_at.map_or(true, |v| v == 0)
            && self.last_touched_at.map_or(true, |v| v == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> CredentialRecord {
        CredentialRecord {
            client_credential: "ghu_abc".to_string(),
            upstream_token: "tok1".to_string(),
            upstream_token_expires_at: 1_000,
            device_identifier: "device-1".to_string(),
            session_identifier: "session-1".to_string(),
            session_expires_at: 900,
            last_touched_at: 100,
        }
    }

    #[test]
    fn test_touch_only_patch_preserves_fields() {
        let mut record = populated();
        record.apply(&CredentialPatch::touch(555));

        assert_eq!(record.last_touched_at, 555);
        assert_eq!(record.upstream_token, "tok1");
        assert_eq!(record.session_identifier, "session-1");
        assert_eq!(record.device_identifier, "device-1");
    }

    #[test]
    fn test_zero_and_empty_values_leave_fields_unchanged() {
        let mut record = populated();
        let patch = CredentialPatch {
            upstream_token: Some(String::new()),
            upstream_token_expires_at: Some(0),
            session_identifier: Some(String::new()),
            session_expires_at: Some(0),
            last_touched_at: Some(0),
            ..CredentialPatch::default()
        };
        assert!(patch.is_empty());

        record.apply(&patch);
        assert_eq!(record, populated());
    }

    #[test]
    fn test_device_identifier_is_write_once() {
        let mut record = CredentialRecord::new("ghu_abc");
        record.apply(&CredentialPatch::default().with_device("first".to_string()));
        record.apply(&CredentialPatch::default().with_device("second".to_string()));

        assert_eq!(record.device_identifier, "first");
    }

    #[test]
    fn test_token_validity_margin() {
        let record = populated();
        assert!(record.token_valid_beyond(500, 300));
        assert!(!record.token_valid_beyond(700, 300));
        assert!(!CredentialRecord::new("x").token_valid_beyond(0, 0));
    }

    #[test]
    fn test_session_expiry_is_strict() {
        let record = populated();
        assert!(!record.session_expired(900));
        assert!(record.session_expired(901));
    }
}
