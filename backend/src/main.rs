//! Main entry point for the ChamaAI backend.
//!
//! This file initializes the Axum web server, sets up the database connection
//! pool, and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod middleware;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::service::AuthService;
use crate::config::Config;
use crate::database::queries::SqliteAccountStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("invalid configuration");

    let pool = database::connect(&config.database_url)
        .await
        .expect("cannot open database");
    database::run_migrations(&pool)
        .await
        .expect("cannot apply schema");

    let store = Arc::new(SqliteAccountStore::new(pool));
    let service = AuthService::new(store, &config).expect("cannot initialize auth service");

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .nest("/api/user", api::user::routes::user_router(service.clone()))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(service);

    let addr = config.bind_addr;
    tracing::debug!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}

async fn root_handler() -> &'static str {
    "Welcome to ChamaAI!"
}
