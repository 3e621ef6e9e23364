//! Credential store errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by a credential store backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// Underlying table operation failed.
    #[error("Database error: {message}")]
    Database { message: String },

    /// Schema check or recreate failed.
    #[error("Schema migration failed: {message}")]
    Migration { message: String },

    /// Filesystem error while preparing the store location.
    #[error("IO error: {message}")]
    Io { message: String },

    /// Blocking worker panicked or was cancelled.
    #[error("Store task failed: {message}")]
    Task { message: String },
}

/// Result type for credential store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
