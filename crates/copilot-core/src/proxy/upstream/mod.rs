pub mod client;
pub mod token_exchange;

pub use client::UpstreamClient;
pub use token_exchange::{ExchangedToken, TokenExchange, TokenExchangeClient};
