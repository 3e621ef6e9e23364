//! Domain models for Copilot Gateway.

pub mod config;
pub mod credential;

pub use config::{GatewayConfig, StorageBackend};
pub use credential::{CredentialPatch, CredentialRecord};
