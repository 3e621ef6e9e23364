// OpenAI-compatible API handlers

mod chat;
mod embeddings;
mod models;

pub use chat::handle_chat_completions;
pub use embeddings::handle_embeddings;
pub use models::handle_list_models;

// Shared imports for submodules
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use copilot_types::ProxyError;
use serde_json::json;

use crate::proxy::common::header_constants::content_type_for;
use crate::proxy::handlers::ApiError;
use crate::proxy::mappers::openai::{transcode, TranscodeOptions};
use crate::proxy::middleware::ClientCredential;
use crate::proxy::server::AppState;

/// Upstream answered with a non-success status before any body was relayed.
fn upstream_status_error(status: reqwest::StatusCode) -> ApiError {
    let message =
        format!("Encountering an error when receiving the github copilot response: {}", status);
    tracing::error!("{}", message);
    ApiError(ProxyError::Upstream { status: status.as_u16(), message })
}

/// Relay a successful upstream reply through the transcoder.
fn stream_response(
    upstream: reqwest::Response,
    options: TranscodeOptions,
) -> Result<Response, ApiError> {
    let content_type = content_type_for(options.is_streaming);
    let body = Body::from_stream(transcode(upstream.bytes_stream(), options));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .header("X-Accel-Buffering", "no")
        .body(body)
        .map_err(|e| {
            ApiError(ProxyError::Upstream {
                status: 500,
                message: format!("Failed to build response: {}", e),
            })
        })
}
