//! Session repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Session;
use crate::AuthError;

/// Storage for login sessions.
///
/// Every method is a single atomic operation on one primary-keyed row (or, for
/// the presence and sweep queries, one statement over the table). No method
/// reads a row and writes it back in a separate step.
///
/// Implementations:
/// - [`InMemorySessionRepository`](super::InMemorySessionRepository): lock-guarded map
/// - `SqliteSessionRepository` (feature `sqlx_sqlite`)
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts a new session row.
    async fn create(&self, session: &Session) -> Result<(), AuthError>;

    /// Finds a session by id, whether or not it has expired.
    async fn find(&self, session_id: &str) -> Result<Option<Session>, AuthError>;

    /// Sets `last_active = at` when the row exists and `expires_at > at`.
    ///
    /// Returns whether a row was updated. Never inserts and never changes
    /// `expires_at`.
    async fn touch(&self, session_id: &str, at: DateTime<Utc>) -> Result<bool, AuthError>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn destroy(&self, session_id: &str) -> Result<(), AuthError>;

    /// Distinct nicknames with `last_active > since` on a session that is
    /// still valid at `now`, most recently active first.
    async fn active_nicknames(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, AuthError>;

    /// Removes sessions with `expires_at <= now`.
    ///
    /// Returns the number of sessions pruned.
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}
