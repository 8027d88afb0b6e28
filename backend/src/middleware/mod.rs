//! General-purpose middleware for the API.
//!
//! This module contains reusable middleware components that are applied to
//! the whole Axum router rather than to a single API domain.

use tower_http::cors::CorsLayer;

/// CORS for the browser frontend, which posts credentials (the session
/// cookie) from a different origin during development.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::very_permissive()
}
