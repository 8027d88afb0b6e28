//! Defines the HTTP routes for the user profile API.
//!
//! Every route here sits behind the authentication middleware, which accepts
//! either a bearer access token or the session cookie.

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;

use super::handlers::me;
use crate::auth::middleware::require_auth;
use crate::auth::service::AuthService;

pub fn user_router(auth: AuthService) -> Router<AuthService> {
    Router::new()
        .route("/me", get(me))
        .route_layer(from_fn_with_state(auth, require_auth))
}
