//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models,
//! which live alongside their handlers.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Account record. `username` is the unique login identifier, derived from
/// the email or phone supplied at signup, and is immutable after creation.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; the clear secret is never stored.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Profile record, exactly one per account. Holds the contact number and the
/// optional chama metadata captured at signup.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: i64,
    pub account_id: i64,
    pub phone: String,
    pub chama_name: String,
    pub chama_type: String,
}

/// Server-side session established at login and referenced by the
/// `sessionid` cookie.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub account_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Payload for the transactional account + profile insert.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub chama_name: String,
    pub chama_type: String,
}
