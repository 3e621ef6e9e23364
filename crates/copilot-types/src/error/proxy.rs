//! Proxy-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur while serving a chat or embeddings request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// No client credential presented, or none recognized.
    #[error("Unauthorized")]
    Unauthenticated,

    /// Token issuance endpoint rejected the credential or returned no token.
    #[error("Token exchange failed with status {status}: {body}")]
    ExchangeFailed { status: u16, body: String },

    /// Credential store read or write failed.
    #[error("Credential storage degraded: {message}")]
    StorageDegraded { message: String },

    /// Upstream connection failed after the response started streaming.
    #[error("Upstream stream error: {message}")]
    UpstreamStream { message: String },

    /// A single upstream line could not be parsed.
    #[error("Malformed upstream line: {message}")]
    MalformedUpstreamLine { message: String },

    /// Inbound request validation failed.
    #[error("{message}")]
    InvalidRequest { message: String },

    /// Upstream answered the API call with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },
}

impl ProxyError {
    /// Whether this error turns into an HTTP error body for the caller.
    ///
    /// Storage and per-line parse failures are recovered locally, and a mid-stream
    /// failure aborts the response instead of producing a body.
    pub fn is_caller_visible(&self) -> bool {
        !matches!(
            self,
            Self::StorageDegraded { .. }
                | Self::MalformedUpstreamLine { .. }
                | Self::UpstreamStream { .. }
        )
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::ExchangeFailed { status, .. } | Self::Upstream { status, .. } => *status,
            Self::StorageDegraded { .. } | Self::MalformedUpstreamLine { .. } => 500,
            Self::UpstreamStream { .. } => 502,
            Self::InvalidRequest { .. } => 400,
        }
    }

    /// Message placed into the `error` field of the JSON error body.
    ///
    /// Exchange failures carry the upstream body verbatim so callers can see why
    /// their credential was refused.
    pub fn client_message(&self) -> String {
        match self {
            Self::ExchangeFailed { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ProxyError {
    fn from(err: StoreError) -> Self {
        Self::StorageDegraded { message: err.to_string() }
    }
}
