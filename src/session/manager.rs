//! Session lifecycle: issue, validate, touch, revoke.

use chrono::{Duration, Utc};

use super::{Session, SessionConfig, SessionRepository};
use crate::AuthError;
use crate::crypto::{DEFAULT_TOKEN_LENGTH, generate_token};

/// Owns the session state machine.
///
/// A session is `Active` from issue until `expires_at`, then logically
/// `Expired`; `revoke` deletes it outright. Nothing moves a session back to
/// `Active`: `touch` only records activity and never extends `expires_at`.
///
/// Expired rows are left in storage by every method here (lazy expiry).
/// [`PruneExpiredSessionsAction`](crate::actions::PruneExpiredSessionsAction)
/// removes them.
#[derive(Clone)]
pub struct SessionManager<S> {
    repository: S,
    session_lifetime: Duration,
}

impl<S: SessionRepository> SessionManager<S> {
    pub fn new(repository: S, config: &SessionConfig) -> Self {
        Self {
            repository,
            session_lifetime: config.session_lifetime,
        }
    }

    pub fn repository(&self) -> &S {
        &self.repository
    }

    /// Creates a session for `user_id` valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Only storage failures.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "session_issue", skip_all, err))]
    pub async fn issue(&self, user_id: &str, nickname: &str) -> Result<Session, AuthError> {
        let now = Utc::now();
        let session = Session {
            id: generate_token(DEFAULT_TOKEN_LENGTH),
            user_id: user_id.to_owned(),
            nickname: nickname.to_owned(),
            expires_at: now + self.session_lifetime,
            last_active: now,
        };

        self.repository.create(&session).await?;

        log::info!(
            target: "forum_auth",
            "msg=\"session issued\", user_id=\"{user_id}\", expires_at=\"{}\"",
            session.expires_at
        );

        Ok(session)
    }

    /// Returns the session if it exists and has not expired.
    ///
    /// Read-only: an expired row is reported as absent but not deleted.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "session_validate", skip_all, err))]
    pub async fn validate(&self, session_id: &str) -> Result<Option<Session>, AuthError> {
        if session_id.is_empty() {
            return Ok(None);
        }

        let session = self.repository.find(session_id).await?;
        Ok(session.filter(|s| !s.is_expired_at(Utc::now())))
    }

    /// Records activity on a live session. Absent or expired sessions are
    /// ignored.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "session_touch", skip_all, err))]
    pub async fn touch(&self, session_id: &str) -> Result<(), AuthError> {
        if session_id.is_empty() {
            return Ok(());
        }

        let updated = self.repository.touch(session_id, Utc::now()).await?;
        if !updated {
            log::debug!(target: "forum_auth", "msg=\"touch ignored for dead session\"");
        }

        Ok(())
    }

    /// Deletes the session. Revoking an unknown session succeeds.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "session_revoke", skip_all, err))]
    pub async fn revoke(&self, session_id: &str) -> Result<(), AuthError> {
        if session_id.is_empty() {
            return Ok(());
        }

        self.repository.destroy(session_id).await?;

        log::info!(target: "forum_auth", "msg=\"session revoked\"");

        Ok(())
    }
}
