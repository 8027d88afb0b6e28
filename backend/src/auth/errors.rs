//! Custom error types specific to authentication failures.
//!
//! This module defines the errors that can occur during signup, login, and
//! token validation, and renders them as the structured JSON responses the
//! frontend expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::errors::StoreError;

/// Per-field validation failures, keyed the way the API reports them:
/// `{"<field>": ["<message>", ...]}`.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(field, _)| *field)
    }

    /// Groups messages by field into the response body.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        for (field, message) in &self.0 {
            match body
                .entry(field.to_string())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(messages) => messages.push(Value::String(message.clone())),
                _ => unreachable!(),
            }
        }
        Value::Object(body)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(FieldErrors),
    /// Unique-constraint violation at insert time, converted from the store.
    #[error("user with this username already exists")]
    DuplicateUsername,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("token encoding failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl AuthError {
    /// Single-field validation error.
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.push(field, message);
        AuthError::Validation(errors)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::Validation(errors) => {
                tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "validation failed");
                (StatusCode::BAD_REQUEST, errors.to_body())
            }
            AuthError::DuplicateUsername => (
                StatusCode::BAD_REQUEST,
                json!({ "detail": "User with this username already exists" }),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "Invalid credentials" }),
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "detail": "Token is invalid or expired" }),
            ),
            AuthError::Store(err) => {
                tracing::error!(error = %err, "storage failure during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
            AuthError::Token(err) => {
                tracing::error!(error = %err, "token issuance failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
            AuthError::Hash(err) => {
                tracing::error!(error = %err, "password hashing failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
