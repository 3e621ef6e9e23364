// Handlers module - API endpoint handlers

pub mod openai;
pub mod pages;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use copilot_types::ProxyError;
use serde_json::json;

/// A request-path failure rendered as `{"error": ..., "code": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(pub ProxyError);

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.http_status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if !self.0.is_caller_visible() {
            tracing::warn!("Internal failure surfaced to caller: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.client_message(), "code": status.as_u16() })))
            .into_response()
    }
}
