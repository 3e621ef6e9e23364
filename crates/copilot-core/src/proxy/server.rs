use axum::{
    routing::{get, post},
    Router,
};
use copilot_types::GatewayConfig;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::modules::credential_store::CredentialStore;
use crate::proxy::common::client_builder::build_http_client;
use crate::proxy::middleware::{cors_layer, rate_limit_middleware, CredentialResolver, GlobalRateLimiter};
use crate::proxy::{TokenExchangeClient, TokenManager, UpstreamClient};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub token_manager: Arc<TokenManager>,
    pub upstream: Arc<UpstreamClient>,
    pub credentials: Arc<CredentialResolver>,
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    /// Wire the request path from configuration and an opened credential store.
    pub fn from_config(config: &GatewayConfig, store: Arc<dyn CredentialStore>) -> AppResult<Self> {
        let http_client = build_http_client().map_err(AppError::Config)?;
        let exchange = Arc::new(TokenExchangeClient::new(http_client.clone(), &config.token_url));

        Ok(Self {
            token_manager: Arc::new(TokenManager::new(store, exchange)),
            upstream: Arc::new(UpstreamClient::new(http_client, &config.upstream_url)),
            credentials: Arc::new(CredentialResolver::from_config(config)),
            rate_limiter: GlobalRateLimiter::per_minute(config.rate_limit).map(Arc::new),
        })
    }
}

/// Build the gateway router. The rate limit applies to the chat and
/// embeddings routes only.
pub fn build_proxy_router(state: AppState) -> Router<()> {
    use crate::proxy::handlers::{openai, pages};

    let api = Router::new()
        .route("/v1/chat/completions", post(openai::handle_chat_completions))
        .route("/v1/embeddings", post(openai::handle_embeddings))
        .layer(axum::middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(api)
        .route("/v1/models", get(openai::handle_list_models))
        .route("/healthz", get(pages::handle_healthz))
        .route("/", get(pages::handle_index))
        .route("/robots.txt", get(pages::handle_robots))
        .fallback(pages::handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}
