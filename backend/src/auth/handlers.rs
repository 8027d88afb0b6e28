//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for signup, login, and
//! token refresh, parse request data, and delegate to the `auth::service`
//! for the core business logic.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::errors::AuthError;
use crate::auth::models::{LoginRequest, RefreshRequest, SignupRequest};
use crate::auth::service::AuthService;

/// Name of the session cookie set on login.
pub const SESSION_COOKIE: &str = "sessionid";

pub async fn signup(
    State(auth): State<AuthService>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let response = auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(auth): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let (session, response) = auth.login(request).await?;
    let max_age = (session.expires_at - session.created_at).num_seconds();
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}",
        session.token
    );
    Ok(([(header::SET_COOKIE, cookie)], Json(response)))
}

pub async fn refresh(
    State(auth): State<AuthService>,
    Json(request): Json<RefreshRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let response = auth.refresh(&request.refresh).await?;
    Ok(Json(response))
}
