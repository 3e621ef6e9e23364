// OpenAI chat completions
use super::*;
use copilot_types::protocol::openai::ChatCompletionRequest;

/// Partial bodies are merged over the defaults; an unparsable body falls back
/// to the defaults entirely.
fn parse_request(body: &Bytes) -> ChatCompletionRequest {
    if body.is_empty() {
        return ChatCompletionRequest::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::debug!("Unparsable chat body, using defaults: {}", e);
        ChatCompletionRequest::default()
    })
}

pub async fn handle_chat_completions(
    State(state): State<AppState>,
    ClientCredential(credential): ClientCredential,
    body: Bytes,
) -> Result<Response, ApiError> {
    let session = state.token_manager.authorize(&credential).await?;
    let request = parse_request(&body);

    tracing::info!("Chat completion: model={}, stream={}", request.model, request.stream);

    let upstream = state.upstream.chat_completions(&session, &request).await?;
    if upstream.status() != reqwest::StatusCode::OK {
        return Err(upstream_status_error(upstream.status()));
    }

    stream_response(upstream, TranscodeOptions::chat(request.model, request.stream))
}
