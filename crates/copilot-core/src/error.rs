//! Unified error types for Copilot Core.

use copilot_types::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error for setup paths: opening the store and building the HTTP client.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Credential store could not be opened or prepared.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for Copilot Core operations.
pub type AppResult<T> = Result<T, AppError>;
