use copilot_types::protocol::openai::{ChatCompletionRequest, EmbeddingRequest};
use copilot_types::ProxyError;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;

use crate::proxy::common::header_constants as hc;
use crate::proxy::token_manager::AuthorizedSession;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const EMBEDDINGS_PATH: &str = "/embeddings";

/// Client for the chat and embeddings API behind the token exchange.
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        },
        _ => tracing::warn!("Dropping invalid upstream header {}", name),
    }
}

/// Headers the upstream expects, derived from the authorized session.
pub(crate) fn build_headers(session: &AuthorizedSession, is_streaming: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(
        &mut headers,
        header::AUTHORIZATION.as_str(),
        &format!("Bearer {}", session.upstream_token),
    );
    insert(&mut headers, hc::X_REQUEST_ID, &uuid::Uuid::new_v4().to_string());
    insert(&mut headers, hc::VSCODE_SESSION_ID, &session.session_identifier);
    insert(&mut headers, hc::VSCODE_MACHINE_ID, &session.device_identifier);
    insert(&mut headers, hc::EDITOR_VERSION, hc::EDITOR_VERSION_VALUE);
    insert(&mut headers, hc::EDITOR_PLUGIN_VERSION, hc::EDITOR_PLUGIN_VERSION_VALUE);
    insert(&mut headers, hc::OPENAI_ORGANIZATION, hc::OPENAI_ORGANIZATION_VALUE);
    insert(&mut headers, hc::OPENAI_INTENT, hc::OPENAI_INTENT_VALUE);
    insert(&mut headers, header::CONTENT_TYPE.as_str(), hc::content_type_for(is_streaming));
    insert(&mut headers, header::USER_AGENT.as_str(), hc::USER_AGENT_VALUE);
    insert(&mut headers, header::ACCEPT.as_str(), "*/*");
    headers
}

impl UpstreamClient {
    pub fn new(http_client: Client, base_url: &str) -> Self {
        Self { http_client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn chat_completions(
        &self,
        session: &AuthorizedSession,
        request: &ChatCompletionRequest,
    ) -> Result<Response, ProxyError> {
        self.post(CHAT_COMPLETIONS_PATH, session, request.stream, request).await
    }

    pub async fn embeddings(
        &self,
        session: &AuthorizedSession,
        request: &EmbeddingRequest,
    ) -> Result<Response, ProxyError> {
        self.post(EMBEDDINGS_PATH, session, false, request).await
    }

    /// Any HTTP status is returned as a response; only transport failures are errors.
    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        session: &AuthorizedSession,
        is_streaming: bool,
        body: &B,
    ) -> Result<Response, ProxyError> {
        let url = format!("{}{}", self.base_url, path);
        let payload = serde_json::to_vec(body).map_err(|e| ProxyError::InvalidRequest {
            message: format!("Failed to encode request: {}", e),
        })?;

        tracing::debug!("Upstream POST {} (stream={})", url, is_streaming);
        self.http_client
            .post(&url)
            .headers(build_headers(session, is_streaming))
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Upstream request to {} failed: {}", url, e);
                ProxyError::Upstream {
                    status: 500,
                    message: format!("Encountering an error when sending the request: {}", e),
                }
            })
    }
}
