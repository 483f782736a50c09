mod config;
pub mod cookie;
mod manager;
mod memory_store;
mod repository;
mod sweeper;

use chrono::{DateTime, Utc};
pub use config::SessionConfig;
pub use cookie::SESSION_COOKIE_NAME;
pub use manager::SessionManager;
pub use memory_store::InMemorySessionRepository;
pub use repository::SessionRepository;
pub use sweeper::spawn_session_sweeper;

/// One login instance.
///
/// `nickname` is copied from the user at issue time and is not refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub nickname: String,
    pub expires_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    /// Validity is the closed-open interval `[issued, expires_at)`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
