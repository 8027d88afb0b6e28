//! Core business logic for the authentication system.
//!
//! This service handles operations such as account creation, password hashing,
//! session management, token issuance, and validation. It orchestrates
//! interactions between handlers and the account store.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use crate::auth::errors::AuthError;
use crate::auth::models::{
    Claims, LoginRequest, LoginResponse, RefreshResponse, SignupRequest, SignupResponse,
    TokenType,
};
use crate::config::Config;
use crate::database::models::{Account, NewAccount, Profile, Session};
use crate::database::queries::AccountStore;
use crate::errors::StoreError;

struct AuthInner {
    store: Arc<dyn AccountStore>,
    argon: Argon2<'static>,
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    session_ttl: Duration,
    /// Verified against when the identifier is unknown, so that path costs
    /// the same as a wrong password.
    dummy_hash: String,
}

#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthInner>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, config: &Config) -> Result<Self, AuthError> {
        let argon = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon
            .hash_password(b"!", &salt)
            .map_err(|err| AuthError::Hash(err.to_string()))?
            .to_string();

        Ok(AuthService {
            inner: Arc::new(AuthInner {
                store,
                argon,
                encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                access_ttl: config.access_token_ttl,
                refresh_ttl: config.refresh_token_ttl,
                session_ttl: config.session_ttl,
                dummy_hash,
            }),
        })
    }

    /// Registers an account with its profile and issues a fresh token pair.
    ///
    /// The username is the email when non-blank, otherwise the phone number.
    /// The existence pre-check and the suffix loop are best effort: two
    /// concurrent signups with the same base identifier can both pass them,
    /// and the database unique constraint is what actually enforces
    /// uniqueness. Its violation is reported as the duplicate error, never as
    /// a raw storage error.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, AuthError> {
        request.validate()?;

        let base = request
            .base_username()
            .ok_or_else(|| AuthError::invalid_field("username", "Either email or phone is required"))?
            .to_string();

        if self.inner.store.username_exists(&base).await? {
            return Err(AuthError::invalid_field(
                "username",
                "A user with this email or phone already exists",
            ));
        }

        let password_hash = self.hash_password(&request.password)?;

        // Re-derive at creation time; the pre-check above races with
        // concurrent signups for the same identifier.
        let mut username = base.clone();
        let mut suffix = 1u32;
        while self.inner.store.username_exists(&username).await? {
            username = format!("{base}-{suffix}");
            suffix += 1;
        }
        if username != base {
            tracing::debug!(%base, %username, "resolved username collision");
        }

        let account = self
            .inner
            .store
            .create_account(NewAccount {
                username,
                email: request.email.trim().to_string(),
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                chama_name: request.chama_name,
                chama_type: request.chama_type,
            })
            .await
            .map_err(|err| match err {
                StoreError::DuplicateUsername => AuthError::DuplicateUsername,
                other => AuthError::Store(other),
            })?;

        tracing::info!(
            account = account.id,
            username = %account.username,
            create_chama = request.create_chama,
            "account created"
        );

        let access = self.issue_token(&account, TokenType::Access)?;
        let refresh = self.issue_token(&account, TokenType::Refresh)?;
        Ok(SignupResponse {
            id: account.id,
            username: account.username,
            access,
            refresh,
        })
    }

    /// Verifies credentials and establishes a server-side session.
    ///
    /// An unknown identifier and a wrong password are indistinguishable to
    /// the caller.
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<(Session, LoginResponse), AuthError> {
        let account = match self
            .inner
            .store
            .find_by_username(request.identifier.trim())
            .await?
        {
            Some(account) => account,
            None => {
                // burn a verification so unknown identifiers cost the same
                // as a wrong password
                let _ = self.verify_password(&request.password, &self.inner.dummy_hash);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.verify_password(&request.password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self
            .inner
            .store
            .create_session(account.id, Utc::now() + self.inner.session_ttl)
            .await?;

        tracing::debug!(account = account.id, "session established");
        Ok((
            session,
            LoginResponse {
                id: account.id,
                username: account.username,
            },
        ))
    }

    /// Exchanges a valid refresh token for a new access token.
    pub async fn refresh(&self, token: &str) -> Result<RefreshResponse, AuthError> {
        let claims = self.decode_token(token, TokenType::Refresh)?;
        let account = self
            .account_for_claims(&claims)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        let access = self.issue_token(&account, TokenType::Access)?;
        Ok(RefreshResponse { access })
    }

    /// Resolves a bearer access token to its account.
    pub async fn authenticate_access(&self, token: &str) -> Result<Account, AuthError> {
        let claims = self.decode_token(token, TokenType::Access)?;
        self.account_for_claims(&claims)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Resolves a session cookie to its account, rejecting expired sessions.
    pub async fn authenticate_session(&self, token: &str) -> Result<Account, AuthError> {
        let session = self
            .inner
            .store
            .find_session(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if session.expires_at <= Utc::now() {
            return Err(AuthError::InvalidToken);
        }
        self.inner
            .store
            .find_by_id(session.account_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    pub async fn profile(&self, account_id: i64) -> Result<Option<Profile>, StoreError> {
        self.inner.store.profile_for(account_id).await
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.inner
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| AuthError::Hash(err.to_string()))
    }

    fn verify_password(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(stored).map_err(|err| AuthError::Hash(err.to_string()))?;
        match self.inner.argon.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(AuthError::Hash(err.to_string())),
        }
    }

    fn issue_token(&self, account: &Account, kind: TokenType) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenType::Access => self.inner.access_ttl,
            TokenType::Refresh => self.inner.refresh_ttl,
        };
        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            token_type: kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.inner.encoding,
        )?)
    }

    fn decode_token(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.inner.decoding,
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;
        if data.claims.token_type != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }

    async fn account_for_claims(&self, claims: &Claims) -> Result<Option<Account>, AuthError> {
        let id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(self.inner.store.find_by_id(id).await?)
    }
}
