//! Handler functions for user profile and management API endpoints.
//!
//! These functions process requests for user data, combine the account with
//! its profile record, and return user-specific information.

use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::middleware::CurrentUser;
use crate::auth::service::AuthService;
use crate::database::models::{Account, Profile};
use crate::errors::ApiError;

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub chama_name: String,
    pub chama_type: String,
}

impl UserProfile {
    fn from_parts(account: Account, profile: Profile) -> Self {
        UserProfile {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            phone: profile.phone,
            chama_name: profile.chama_name,
            chama_type: profile.chama_type,
        }
    }
}

/// Returns the signed-in account with its profile fields.
pub async fn me(
    State(auth): State<AuthService>,
    Extension(CurrentUser(account)): Extension<CurrentUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = auth.profile(account.id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(UserProfile::from_parts(account, profile)))
}
