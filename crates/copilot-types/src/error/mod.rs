//! Typed error definitions for Copilot Gateway.
//!
//! Two domains are kept apart:
//!
//! - [`ProxyError`] is the per-request taxonomy seen by handlers
//! - [`StoreError`] is what a credential store backend reports
//!
//! Storage failures never cross into the caller's response on their own: they
//! are folded into [`ProxyError::StorageDegraded`], logged, and then treated as
//! a cache miss.

mod proxy;
mod store;

pub use proxy::ProxyError;
pub use store::{StoreError, StoreResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ProxyError::ExchangeFailed { status: 401, body: "bad credentials".to_string() };

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("ExchangeFailed"));
        assert!(json.contains("bad credentials"));

        let deserialized: ProxyError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Migration { message: "missing column last_touched".to_string() };
        assert!(err.to_string().contains("last_touched"));
    }
}
