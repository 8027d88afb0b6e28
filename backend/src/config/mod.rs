//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server bind address, JWT signing secret, and the
//! lifetimes of issued tokens and sessions.

use std::env;
use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "chamaai-dev-secret-do-not-use-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, sourced from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env_or("BIND_ADDR", "127.0.0.1:3000");
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr,
        })?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to an insecure dev secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        Ok(Config {
            bind_addr,
            database_url: env_or("DATABASE_URL", "sqlite://chamaai.db"),
            jwt_secret,
            access_token_ttl: ttl_from("ACCESS_TOKEN_TTL_SECS", 5 * 60)?,
            refresh_token_ttl: ttl_from("REFRESH_TOKEN_TTL_SECS", 24 * 60 * 60)?,
            session_ttl: ttl_from("SESSION_TTL_SECS", 14 * 24 * 60 * 60)?,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn ttl_from(name: &'static str, default_secs: i64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(raw) => {
            let secs: i64 = raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: raw })?;
            Ok(Duration::seconds(secs))
        }
        Err(_) => Ok(Duration::seconds(default_secs)),
    }
}
