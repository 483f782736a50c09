//! "Who is online", derived from session activity.
//!
//! Presence is never stored. A user is online when one of their live
//! sessions has `last_active` inside the presence window, so the list is only
//! as fresh as the calls to [`SessionManager::touch`]. The HTTP layer makes
//! those calls from the `track_activity` middleware on every request that
//! carries a session cookie; a surface that skips it will see users drop off
//! the list after one window even while they are active.
//!
//! [`SessionManager::touch`]: crate::SessionManager::touch

use chrono::{Duration, Utc};

use crate::AuthError;
use crate::session::SessionRepository;

/// Read-only view over the session store.
#[derive(Clone)]
pub struct PresenceTracker<S> {
    repository: S,
    window: Duration,
}

impl<S: SessionRepository> PresenceTracker<S> {
    pub fn new(repository: S, window: Duration) -> Self {
        Self { repository, window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Nicknames active within the configured window, most recent first.
    pub async fn online_users(&self) -> Result<Vec<String>, AuthError> {
        self.online_users_within(self.window).await
    }

    /// Distinct nicknames with `last_active > now - window` on a session that
    /// has not expired, most recently active first.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "online_users", skip(self), err)
    )]
    pub async fn online_users_within(&self, window: Duration) -> Result<Vec<String>, AuthError> {
        let now = Utc::now();
        self.repository.active_nicknames(now - window, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{InMemorySessionRepository, Session, SessionConfig, SessionManager};

    async fn seed(repo: &InMemorySessionRepository, id: &str, nickname: &str, idle: Duration) {
        let now = Utc::now();
        repo.create(&Session {
            id: id.to_owned(),
            user_id: format!("user-{nickname}"),
            nickname: nickname.to_owned(),
            expires_at: now + Duration::hours(12),
            last_active: now - idle,
        })
        .await
        .unwrap();
    }

    fn tracker(repo: &InMemorySessionRepository) -> PresenceTracker<InMemorySessionRepository> {
        PresenceTracker::new(repo.clone(), SessionConfig::default().presence_window)
    }

    #[tokio::test]
    async fn test_window_boundary() {
        let repo = InMemorySessionRepository::new();
        seed(&repo, "s1", "recent", Duration::minutes(1)).await;
        seed(&repo, "s2", "stale", Duration::minutes(6)).await;

        assert_eq!(tracker(&repo).online_users().await.unwrap(), vec!["recent"]);
    }

    #[tokio::test]
    async fn test_one_entry_per_nickname() {
        let repo = InMemorySessionRepository::new();
        seed(&repo, "s1", "alice", Duration::minutes(1)).await;
        seed(&repo, "s2", "alice", Duration::minutes(2)).await;
        seed(&repo, "s3", "bob", Duration::seconds(30)).await;

        assert_eq!(
            tracker(&repo).online_users().await.unwrap(),
            vec!["bob".to_owned(), "alice".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_custom_window() {
        let repo = InMemorySessionRepository::new();
        seed(&repo, "s1", "alice", Duration::minutes(8)).await;

        let tracker = tracker(&repo);
        assert!(tracker.online_users().await.unwrap().is_empty());
        assert_eq!(
            tracker.online_users_within(Duration::minutes(10)).await.unwrap(),
            vec!["alice"]
        );
    }

    #[tokio::test]
    async fn test_touch_brings_user_back_online() {
        let repo = InMemorySessionRepository::new();
        seed(&repo, "s1", "alice", Duration::minutes(20)).await;
        let manager = SessionManager::new(repo.clone(), &SessionConfig::default());
        let tracker = tracker(&repo);

        assert!(tracker.online_users().await.unwrap().is_empty());

        manager.touch("s1").await.unwrap();
        assert_eq!(tracker.online_users().await.unwrap(), vec!["alice"]);
    }

    #[tokio::test]
    async fn test_revoked_session_is_offline() {
        let repo = InMemorySessionRepository::new();
        let manager = SessionManager::new(repo.clone(), &SessionConfig::default());
        let session = manager.issue("user-1", "alice").await.unwrap();
        let tracker = tracker(&repo);

        assert_eq!(tracker.online_users().await.unwrap(), vec!["alice"]);

        manager.revoke(&session.id).await.unwrap();
        assert!(tracker.online_users().await.unwrap().is_empty());
    }
}
