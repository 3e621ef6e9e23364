// Middleware module - Axum middleware and extractors

pub mod auth;
pub mod cors;
pub mod rate_limiter;

pub use auth::{ClientCredential, CredentialResolver};
pub use cors::cors_layer;
pub use rate_limiter::{rate_limit_middleware, GlobalRateLimiter};
