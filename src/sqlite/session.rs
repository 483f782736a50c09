use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::database_error;
use crate::AuthError;
use crate::session::{Session, SessionRepository};

/// `SQLite` session storage. Every method is a single statement keyed by the
/// session id or a single scan of the table.
#[derive(Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    id: String,
    user_id: String,
    nickname: String,
    expires_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl From<SessionRecord> for Session {
    fn from(row: SessionRecord) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            nickname: row.nickname,
            expires_at: row.expires_at,
            last_active: row.last_active,
        }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn create(&self, session: &Session) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, nickname, expires_at, last_active) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.nickname)
        .bind(session.expires_at)
        .bind(session.last_active)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("create_session", &e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find(&self, session_id: &str) -> Result<Option<Session>, AuthError> {
        let row: Option<SessionRecord> = sqlx::query_as(
            "SELECT id, user_id, nickname, expires_at, last_active FROM sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find_session", &e))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, session_id), err))]
    async fn touch(&self, session_id: &str, at: DateTime<Utc>) -> Result<bool, AuthError> {
        let result =
            sqlx::query("UPDATE sessions SET last_active = ? WHERE id = ? AND expires_at > ?")
                .bind(at)
                .bind(session_id)
                .bind(at)
                .execute(&self.pool)
                .await
                .map_err(|e| database_error("touch_session", &e))?;

        Ok(result.rows_affected() > 0)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn destroy(&self, session_id: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("destroy_session", &e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn active_nicknames(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, AuthError> {
        sqlx::query_scalar(
            "SELECT nickname FROM sessions WHERE last_active > ? AND expires_at > ? GROUP BY nickname ORDER BY MAX(last_active) DESC, nickname ASC",
        )
        .bind(since)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("active_nicknames", &e))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("prune_expired_sessions", &e))?;

        Ok(result.rows_affected())
    }
}
