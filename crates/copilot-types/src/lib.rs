//! # Copilot Types
//!
//! Core types, models, and error definitions for Copilot Gateway.
//!
//! - **`error`** - Typed error taxonomy for the proxy path and the credential store
//! - **`models`** - Credential records, partial updates, gateway configuration
//! - **`protocol`** - OpenAI request shapes accepted on the inbound side
//!
//! ## Architecture Role
//!
//! ```text
//!        copilot-types (this crate)
//!                │
//!                ▼
//!          copilot-core
//!                │
//!                ▼
//!         copilot-server
//! ```

pub mod error;
pub mod models;
pub mod protocol;

pub use error::{ProxyError, StoreError, StoreResult};
pub use models::{CredentialPatch, CredentialRecord, GatewayConfig, StorageBackend};
