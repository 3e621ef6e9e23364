//! Exchange of a long-lived client credential for a short-lived upstream token.
//!
//! One outbound request per call and no retry loop: a refusal almost always
//! means the credential itself is invalid or revoked.

use async_trait::async_trait;
use copilot_types::ProxyError;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;

use crate::modules::credential_store::mask_credential;

/// Token issued by the exchange endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangedToken {
    #[serde(default)]
    pub token: String,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: i64,
}

#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange(&self, client_credential: &str) -> Result<ExchangedToken, ProxyError>;
}

pub struct TokenExchangeClient {
    http_client: Client,
    token_url: String,
}

fn internal_failure(message: String) -> ProxyError {
    ProxyError::ExchangeFailed { status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(), body: message }
}

impl TokenExchangeClient {
    pub fn new(http_client: Client, token_url: impl Into<String>) -> Self {
        Self { http_client, token_url: token_url.into() }
    }
}

#[async_trait]
impl TokenExchange for TokenExchangeClient {
    async fn exchange(&self, client_credential: &str) -> Result<ExchangedToken, ProxyError> {
        let masked = mask_credential(client_credential);

        let response = self
            .http_client
            .get(&self.token_url)
            .header(header::AUTHORIZATION, format!("token {}", client_credential))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token exchange request failed for {}: {}", masked, e);
                internal_failure(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read token exchange response for {}: {}", masked, e);
            internal_failure(e.to_string())
        })?;

        if status != StatusCode::OK {
            tracing::error!(
                "Token exchange rejected for {}: status {}, body: {}",
                masked,
                status.as_u16(),
                body
            );
            return Err(ProxyError::ExchangeFailed { status: status.as_u16(), body });
        }

        let issued: ExchangedToken = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Token exchange returned undecodable JSON for {}: {}", masked, e);
            internal_failure(e.to_string())
        })?;

        if issued.token.is_empty() {
            tracing::error!("Token exchange returned an empty token for {}", masked);
            return Err(internal_failure("Token exchange returned an empty token".to_string()));
        }

        tracing::debug!("Exchanged token for {}, expires_at={}", masked, issued.expires_at);
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> TokenExchangeClient {
        TokenExchangeClient::new(Client::new(), format!("{}/copilot_internal/v2/token", server.uri()))
    }

    #[tokio::test]
    async fn test_exchange_success_sends_token_scheme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/copilot_internal/v2/token"))
            .and(header_eq("authorization", "token ghu_abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"token": "tok1", "expires_at": 1800})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let issued = client_for(&server).await.exchange("ghu_abc").await.unwrap();
        assert_eq!(issued, ExchangedToken { token: "tok1".to_string(), expires_at: 1800 });
    }

    #[tokio::test]
    async fn test_exchange_non_success_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"Bad credentials\"}"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.exchange("revoked").await.unwrap_err();
        assert_eq!(
            err,
            ProxyError::ExchangeFailed {
                status: 401,
                body: "{\"message\":\"Bad credentials\"}".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_exchange_empty_token_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"token": "", "expires_at": 1800})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.exchange("ghu_abc").await.unwrap_err();
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_exchange_invalid_json_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.exchange("ghu_abc").await.unwrap_err();
        assert!(matches!(err, ProxyError::ExchangeFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_exchange_unreachable_endpoint() {
        let client = TokenExchangeClient::new(Client::new(), "http://127.0.0.1:1/token");
        let err = client.exchange("ghu_abc").await.unwrap_err();
        assert!(matches!(err, ProxyError::ExchangeFailed { status: 500, .. }));
    }
}
