// CORS middleware
use tower_http::cors::{Any, CorsLayer};

/// Browser clients call the API from arbitrary origins; preflight is answered
/// by the layer itself.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600))
}
