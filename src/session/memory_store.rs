//! In-memory session storage.
//!
//! Suitable for development, testing, and single-instance deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Session;
use super::repository::SessionRepository;
use crate::AuthError;

/// In-memory session storage.
///
/// Stores sessions in a `HashMap` behind a single `RwLock`. Each trait
/// method takes the lock exactly once, so a touch can never race a revoke
/// into resurrecting a session.
///
/// Sessions are lost when the process restarts.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, including expired ones not yet pruned.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::DatabaseError("Lock poisoned".to_owned())
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AuthError> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(session.id.clone(), session.clone());

        Ok(())
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, AuthError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(session_id).cloned())
    }

    async fn touch(&self, session_id: &str, at: DateTime<Utc>) -> Result<bool, AuthError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        match sessions.get_mut(session_id) {
            Some(session) if session.expires_at > at => {
                session.last_active = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn destroy(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.write().map_err(poisoned)?.remove(session_id);

        Ok(())
    }

    async fn active_nicknames(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, AuthError> {
        let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
        {
            let sessions = self.sessions.read().map_err(poisoned)?;
            for session in sessions
                .values()
                .filter(|s| s.last_active > since && s.expires_at > now)
            {
                latest
                    .entry(session.nickname.clone())
                    .and_modify(|seen| *seen = (*seen).max(session.last_active))
                    .or_insert(session.last_active);
            }
        }

        let mut online: Vec<(String, DateTime<Utc>)> = latest.into_iter().collect();
        online.sort_by(|(a_name, a_seen), (b_name, b_seen)| {
            b_seen.cmp(a_seen).then_with(|| a_name.cmp(b_name))
        });

        Ok(online.into_iter().map(|(nickname, _)| nickname).collect())
    }

    #[allow(clippy::significant_drop_tightening)]
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;

        let before_count = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);

        let pruned = before_count.saturating_sub(sessions.len());
        Ok(u64::try_from(pruned).unwrap_or(u64::MAX))
    }
}
