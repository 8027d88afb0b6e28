//! Data structures for authentication-related entities.
//!
//! This module defines the signup, login, and refresh request payloads with
//! their field validation, the corresponding response bodies, and the JWT
//! claims used for data transfer within the authentication flow.

use serde::{Deserialize, Serialize};

use crate::auth::errors::{AuthError, FieldErrors};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Informational flag from the signup form; profile metadata is stored
    /// whether or not it is set.
    #[serde(default)]
    pub create_chama: bool,
    #[serde(default)]
    pub chama_name: String,
    #[serde(default)]
    pub chama_type: String,
}

impl SignupRequest {
    /// Field-level validation. Collects every failing field so the response
    /// reports them all at once.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = FieldErrors::default();

        if self.first_name.trim().is_empty() {
            errors.push("first_name", "This field is required");
        } else if self.first_name.chars().count() > 150 {
            errors.push("first_name", "Must be 150 characters or fewer");
        }
        if self.last_name.chars().count() > 150 {
            errors.push("last_name", "Must be 150 characters or fewer");
        }
        if self.phone.trim().is_empty() {
            errors.push("phone", "This field is required");
        } else if self.phone.chars().count() > 32 {
            errors.push("phone", "Must be 32 characters or fewer");
        }
        if !self.email.trim().is_empty() && !looks_like_email(self.email.trim()) {
            errors.push("email", "Enter a valid email address");
        }
        if self.password.chars().count() < 8 {
            errors.push("password", "Password must be at least 8 characters");
        }
        if self.chama_name.chars().count() > 128 {
            errors.push("chama_name", "Must be 128 characters or fewer");
        }
        if self.chama_type.chars().count() > 128 {
            errors.push("chama_type", "Must be 128 characters or fewer");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(errors))
        }
    }

    /// The base identifier: email when non-blank, otherwise phone.
    pub fn base_username(&self) -> Option<&str> {
        [&self.email, &self.phone]
            .into_iter()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
    }
}

/// Minimal shape check; full deliverability is not our concern.
fn looks_like_email(value: &str) -> bool {
    match value.rsplit_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: i64,
    pub username: String,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Discriminates the two halves of an issued pair; refresh tokens are never
/// accepted where an access token is required and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims for both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, stringified per JWT convention.
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}
