//! Proxy module - OpenAI-compatible gateway in front of the upstream API
//!
//! - `token_manager` - session rotation and upstream token refresh
//! - `upstream` - token exchange client and chat/embeddings client
//! - `mappers` - upstream reply transcoding
//! - `handlers`, `middleware`, `server` - HTTP surface

pub mod common;
pub mod handlers;
pub mod mappers;
pub mod middleware;
pub mod server;
pub mod token_manager;
pub mod upstream;

pub use server::{build_proxy_router, AppState};
pub use token_manager::{AuthorizedSession, TokenManager};
pub use upstream::{TokenExchange, TokenExchangeClient, UpstreamClient};
