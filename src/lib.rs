//! Credential, session and presence management for a forum backend.
//!
//! The crate verifies passwords, runs the login-session lifecycle
//! (issue, validate, touch, revoke), derives "who is online" from session
//! activity, and binds sessions to a single HTTP cookie.
//!
//! Storage is abstracted behind [`UserRepository`] and
//! [`session::SessionRepository`]. The `sqlx_sqlite` feature provides the
//! `SQLite` implementations and the `axum_api` feature provides the HTTP
//! surface.

pub mod actions;
pub mod api;
pub mod config;
pub mod crypto;
pub mod presence;
pub mod repository;
mod secret;
pub mod session;
pub mod validators;

#[cfg(feature = "sqlx_sqlite")]
pub mod sqlite;

pub use config::{ForumConfig, HasherConfig, SessionConfig};
pub use presence::PresenceTracker;
pub use repository::{LoginIdentifier, NewUser, User, UserRepository};
#[cfg(any(test, feature = "mocks"))]
pub use repository::MockUserRepository;
pub use secret::SecretString;
pub use session::{InMemorySessionRepository, Session, SessionManager, SessionRepository};
pub use validators::ValidationError;

/// Errors produced by credential and session operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Nickname already taken")]
    DuplicateNickname,
    #[error("Email already registered")]
    DuplicateEmail,
    /// Returned for both unknown identifiers and wrong passwords.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Failed to hash password")]
    PasswordHashError,
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for errors whose detail must not reach a client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::PasswordHashError
                | Self::DatabaseError(_)
                | Self::ConfigurationError(_)
                | Self::Internal(_)
        )
    }
}
