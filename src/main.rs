//! Forum auth server: `SQLite` storage, axum routes, background session sweep.
//!
//! Configured from the environment (see [`ForumConfig::from_env`]); log
//! verbosity follows `RUST_LOG` and defaults to `info`.

use std::process::ExitCode;
use std::str::FromStr;

use forum_auth::api::axum::{AppState, forum_app};
use forum_auth::crypto::{Argon2Hasher, PasswordHasher};
use forum_auth::session::spawn_session_sweeper;
use forum_auth::sqlite::{create_repositories, migrations};
use forum_auth::{AuthError, ForumConfig};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!(target: "forum_auth", "msg=\"server exited\", error=\"{e}\"");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AuthError> {
    let config = ForumConfig::from_env()?;

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| AuthError::ConfigurationError(format!("invalid DATABASE_URL: {e}")))?
        .create_if_missing(true);
    // a single connection keeps an in-memory database alive and shared
    let max_connections = if config.database_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    migrations::run(&pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

    // construction hashes the dummy password; fails here on bad cost params
    let hasher = Argon2Hasher::from_config(config.hasher);
    hasher.dummy_hash()?;

    let (users, sessions) = create_repositories(pool);
    let sweeper = spawn_session_sweeper(sessions.clone(), config.session.sweep_interval);

    let state = AppState::new(users, sessions, hasher, config.session.clone());
    let app = forum_app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| AuthError::ConfigurationError(format!("cannot bind {}: {e}", config.bind_addr)))?;
    log::info!(target: "forum_auth", "msg=\"listening\", addr=\"{}\"", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AuthError::Internal(format!("server error: {e}")))?;

    sweeper.abort();
    log::info!(target: "forum_auth", "msg=\"shutdown complete\"");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: "forum_auth", "msg=\"failed to listen for shutdown signal\", error=\"{e}\"");
        std::future::pending::<()>().await;
    }
    log::info!(target: "forum_auth", "msg=\"shutdown signal received\"");
}
