//! Runs periodically to delete expired sessions and keep the table from growing without bound.

use chrono::Utc;

use crate::AuthError;
use crate::session::SessionRepository;

pub struct PruneExpiredSessionsAction<S> {
    sessions: S,
}

impl<S: SessionRepository> PruneExpiredSessionsAction<S> {
    pub fn new(sessions: S) -> Self {
        Self { sessions }
    }

    /// Deletes every session whose `expires_at` has passed.
    ///
    /// Validation already treats such sessions as absent; this only reclaims
    /// storage.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self), name = "prune_expired_sessions")
    )]
    pub async fn execute(&self) -> Result<u64, AuthError> {
        let pruned = self.sessions.prune_expired(Utc::now()).await?;

        log::info!(target: "forum_auth", "msg=\"sessions pruned\", count={pruned}");

        Ok(pruned)
    }
}
