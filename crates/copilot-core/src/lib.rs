//! # Copilot Core
//!
//! Core logic for Copilot Gateway.
//!
//! ```text
//! copilot-core/src/
//! ├── modules/credential_store/  # CredentialStore trait + SQLite / in-memory backends
//! └── proxy/
//!     ├── token_manager/         # session rotation, token refresh orchestration
//!     ├── upstream/              # token exchange client, chat/embeddings client
//!     ├── mappers/openai/        # line-by-line stream transcoder
//!     ├── handlers/openai/       # axum handlers
//!     ├── middleware/            # credential extraction, CORS, rate limiting
//!     └── server.rs              # router + AppState
//! ```
//!
//! Request flow: credential → [`proxy::TokenManager::authorize`] → upstream call
//! with session headers → [`proxy::mappers::openai::transcode`] → caller.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Lock guards in store backends are scoped to a single statement"
)]
#![allow(
    clippy::module_name_repetitions,
    reason = "Store and proxy types are re-exported under short paths"
)]
// Test-only lints: allow panic!, println!, etc. in test code
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::assertions_on_result_states
    )
)]

pub mod error;
pub mod modules;
pub mod proxy;

// Re-export commonly used types
pub use copilot_types::{CredentialPatch, CredentialRecord, GatewayConfig, ProxyError};
pub use error::{AppError, AppResult};
pub use modules::credential_store::{open_credential_store, CredentialStore};
pub use proxy::{build_proxy_router, AppState, TokenManager};
