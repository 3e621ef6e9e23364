use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Shared HTTP client for the token endpoint and the upstream API.
///
/// No overall request timeout: chat streams stay open for as long as the
/// upstream keeps sending.
pub fn build_http_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))
}
