//! `SQLite` implementations of the user and session repositories.
//!
//! Enable the `sqlx_sqlite` feature to use these implementations.
//! Timestamps are stored as RFC 3339 UTC text, so `<`/`>` comparisons in SQL
//! follow chronological order.

pub mod migrations;
mod session;
mod user;

pub use session::SqliteSessionRepository;
use sqlx::SqlitePool;
pub use user::SqliteUserRepository;

use crate::AuthError;

/// Creates both repositories from one connection pool.
pub fn create_repositories(pool: SqlitePool) -> (SqliteUserRepository, SqliteSessionRepository) {
    (
        SqliteUserRepository::new(pool.clone()),
        SqliteSessionRepository::new(pool),
    )
}

fn database_error(operation: &'static str, e: &sqlx::Error) -> AuthError {
    log::error!(
        target: "forum_auth",
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );
    AuthError::DatabaseError(e.to_string())
}
