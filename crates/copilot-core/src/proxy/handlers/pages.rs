// Non-API routes: health, landing page, robots, fallback

use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Copilot Gateway</title>
</head>
<body>
<h1>Copilot Gateway</h1>
<p>This service is intended for personal use only. Do not share your deployment or your
credentials with others, and do not expose it as a public service.</p>
</body>
</html>
"#;

const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /\n";

pub async fn handle_healthz() -> impl IntoResponse {
    Json(json!({ "message": "ok" }))
}

pub async fn handle_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

pub async fn handle_robots() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], ROBOTS_TXT)
}

pub async fn handle_not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Invalid URL ({} {})", method, uri.path()) })),
    )
}
