//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations behind the
//! `AccountStore` trait, abstracting the query logic from higher-level
//! services and API handlers. Services hold the store as an injected
//! `Arc<dyn AccountStore>` so tests can substitute their own implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Account, NewAccount, Profile, Session};
use crate::errors::StoreError;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Inserts the account and its profile in one transaction. A unique
    /// violation on the username column surfaces as
    /// `StoreError::DuplicateUsername`.
    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError>;

    async fn profile_for(&self, account_id: i64) -> Result<Option<Profile>, StoreError>;

    async fn create_session(
        &self,
        account_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError>;
}

/// SQLx-backed implementation of the account store.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteAccountStore { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateUsername,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, first_name, last_name, created_at \
             FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, first_name, last_name, created_at \
             FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn create_account(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, password_hash, first_name, last_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, username, email, password_hash, first_name, last_name, created_at",
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_insert_error)?;

        sqlx::query(
            "INSERT INTO profiles (account_id, phone, chama_name, chama_type) VALUES (?, ?, ?, ?)",
        )
        .bind(account.id)
        .bind(&new.phone)
        .bind(&new.chama_name)
        .bind(&new.chama_type)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(account)
    }

    async fn profile_for(&self, account_id: i64) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, account_id, phone, chama_name, chama_type \
             FROM profiles WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    // TODO: purge expired session rows with a periodic DELETE
    async fn create_session(
        &self,
        account_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (token, account_id, created_at, expires_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING token, account_id, created_at, expires_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(account_id)
        .bind(Utc::now())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn find_session(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, account_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use chrono::Duration;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn memory_store() -> SqliteAccountStore {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        database::run_migrations(&pool).await.unwrap();
        SqliteAccountStore::new(pool)
    }

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: String::new(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "Asha".to_string(),
            last_name: String::new(),
            phone: "0700000001".to_string(),
            chama_name: "Umoja".to_string(),
            chama_type: "merry-go-round".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_account_with_profile() {
        let store = memory_store().await;

        let account = store.create_account(new_account("0700000001")).await.unwrap();
        assert_eq!(account.username, "0700000001");

        let found = store.find_by_username("0700000001").await.unwrap().unwrap();
        assert_eq!(found.id, account.id);
        assert!(store.username_exists("0700000001").await.unwrap());

        let profile = store.profile_for(account.id).await.unwrap().unwrap();
        assert_eq!(profile.phone, "0700000001");
        assert_eq!(profile.chama_name, "Umoja");
    }

    #[tokio::test]
    async fn duplicate_username_maps_to_store_error() {
        let store = memory_store().await;
        store.create_account(new_account("a@b.com")).await.unwrap();

        let err = store.create_account(new_account("a@b.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn deleting_account_cascades_to_profile() {
        let store = memory_store().await;
        let account = store.create_account(new_account("a@b.com")).await.unwrap();

        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(account.id)
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.profile_for(account.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_roundtrip() {
        let store = memory_store().await;
        let account = store.create_account(new_account("a@b.com")).await.unwrap();

        let session = store
            .create_session(account.id, Utc::now() + Duration::days(14))
            .await
            .unwrap();

        let found = store.find_session(&session.token).await.unwrap().unwrap();
        assert_eq!(found.account_id, account.id);
        assert!(found.expires_at > Utc::now());

        assert!(store.find_session("missing").await.unwrap().is_none());
    }
}
