//! Middleware for protecting authenticated routes.
//!
//! This module validates the caller's credentials, either a bearer access
//! token or the session cookie set at login, and attaches the resolved
//! account to the request for downstream handlers.

use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::errors::AuthError;
use crate::auth::handlers::SESSION_COOKIE;
use crate::auth::service::AuthService;
use crate::database::models::Account;

/// The authenticated account, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Account);

pub async fn require_auth<B>(
    State(auth): State<AuthService>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, AuthError> {
    let account = if let Some(token) = bearer_token(request.headers()) {
        auth.authenticate_access(token).await?
    } else if let Some(token) = session_token(request.headers()) {
        auth.authenticate_session(&token).await?
    } else {
        return Err(AuthError::InvalidToken);
    };

    request.extensions_mut().insert(CurrentUser(account));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc-123; lang=sw"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());
        assert!(session_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert!(bearer_token(&headers).is_none());
    }
}
