//! CORS layer.
//!
//! The gateway is consumed by browser frontends on other origins; methods
//! and headers stay open, credentials stay off.

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS for the public REST surface.
pub fn permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
