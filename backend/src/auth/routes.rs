//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle user signup, login, and token refreshing. They are
//! designed to be nested under `/api/auth` in the main Axum router.

use axum::routing::post;
use axum::Router;

use crate::auth::handlers::{login, refresh, signup};
use crate::auth::service::AuthService;

pub fn auth_router() -> Router<AuthService> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
