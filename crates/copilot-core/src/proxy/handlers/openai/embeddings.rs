// OpenAI embeddings
use super::*;
use copilot_types::protocol::openai::EmbeddingRequest;

pub async fn handle_embeddings(
    State(state): State<AppState>,
    ClientCredential(credential): ClientCredential,
    body: Bytes,
) -> Result<Response, ApiError> {
    let session = state.token_manager.authorize(&credential).await?;

    let mut request: EmbeddingRequest = serde_json::from_slice(&body).unwrap_or_default();
    if !request.has_input() {
        return Err(ApiError(ProxyError::InvalidRequest {
            message: "Input cannot be empty.".to_string(),
        }));
    }
    request.normalize_input();

    tracing::info!("Embeddings: model={}", request.model);

    let upstream = state.upstream.embeddings(&session, &request).await?;
    if upstream.status() != reqwest::StatusCode::OK {
        return Err(upstream_status_error(upstream.status()));
    }

    stream_response(upstream, TranscodeOptions::embeddings(request.model))
}
