//! Client credential extraction.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use copilot_types::{GatewayConfig, ProxyError};
use std::collections::HashSet;

use crate::proxy::handlers::ApiError;
use crate::proxy::server::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Maps the presented `Authorization` value to the client credential used
/// for the token exchange.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    default_credential: String,
    super_token_enabled: bool,
    super_tokens: HashSet<String>,
}

impl CredentialResolver {
    pub fn new(
        default_credential: impl Into<String>,
        super_token_enabled: bool,
        super_tokens: HashSet<String>,
    ) -> Self {
        Self { default_credential: default_credential.into(), super_token_enabled, super_tokens }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.copilot_token.clone(), config.enable_super_token, config.super_tokens())
    }

    /// A configured default credential replaces the presented one, unless super
    /// tokens are enabled and the presented value is not one of them.
    pub fn resolve(&self, authorization: Option<&str>) -> Option<String> {
        let presented = authorization
            .map(|value| value.strip_prefix(BEARER_PREFIX).unwrap_or(value))
            .unwrap_or_default();

        if !self.default_credential.is_empty()
            && (!self.super_token_enabled || self.super_tokens.contains(presented))
        {
            return Some(self.default_credential.clone());
        }

        if presented.is_empty() {
            None
        } else {
            Some(presented.to_string())
        }
    }
}

/// The resolved client credential of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredential(pub String);

#[async_trait]
impl FromRequestParts<AppState> for ClientCredential {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authorization =
            parts.headers.get(header::AUTHORIZATION).and_then(|value| value.to_str().ok());

        state
            .credentials
            .resolve(authorization)
            .map(ClientCredential)
            .ok_or(ApiError(ProxyError::Unauthenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supers(tokens: &[&str]) -> HashSet<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_strips_bearer_prefix() {
        let resolver = CredentialResolver::default();
        assert_eq!(resolver.resolve(Some("Bearer ghu_abc")).as_deref(), Some("ghu_abc"));
        assert_eq!(resolver.resolve(Some("ghu_abc")).as_deref(), Some("ghu_abc"));
    }

    #[test]
    fn test_missing_credential() {
        let resolver = CredentialResolver::default();
        assert_eq!(resolver.resolve(None), None);
        assert_eq!(resolver.resolve(Some("Bearer ")), None);
    }

    #[test]
    fn test_default_credential_without_super_tokens() {
        let resolver = CredentialResolver::new("ghu_server", false, HashSet::new());
        assert_eq!(resolver.resolve(None).as_deref(), Some("ghu_server"));
        assert_eq!(resolver.resolve(Some("Bearer anything")).as_deref(), Some("ghu_server"));
    }

    #[test]
    fn test_default_credential_gated_by_super_tokens() {
        let resolver = CredentialResolver::new("ghu_server", true, supers(&["sk-super"]));
        assert_eq!(resolver.resolve(Some("Bearer sk-super")).as_deref(), Some("ghu_server"));
        assert_eq!(resolver.resolve(Some("Bearer ghu_own")).as_deref(), Some("ghu_own"));
        assert_eq!(resolver.resolve(None), None);
    }

    #[test]
    fn test_from_config() {
        let config = GatewayConfig {
            copilot_token: "ghu_server".to_string(),
            enable_super_token: true,
            super_token: "a, b".to_string(),
            ..GatewayConfig::default()
        };
        let resolver = CredentialResolver::from_config(&config);
        assert_eq!(resolver.resolve(Some("Bearer b")).as_deref(), Some("ghu_server"));
        assert_eq!(resolver.resolve(Some("Bearer c")).as_deref(), Some("c"));
    }
}
