use chrono::Duration;

/// Session lifetime, presence and cookie settings.
///
/// The cookie name is not configurable: issue and validation both use
/// [`SESSION_COOKIE_NAME`](super::SESSION_COOKIE_NAME).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fixed validity from issue; never extended by activity.
    pub session_lifetime: Duration,
    /// How recent `last_active` must be for a user to count as online.
    pub presence_window: Duration,
    /// How often the background sweep deletes expired sessions.
    pub sweep_interval: std::time::Duration,
    /// Adds the `Secure` attribute to the session cookie.
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_lifetime: Duration::hours(24),
            presence_window: Duration::minutes(5),
            sweep_interval: std::time::Duration::from_secs(15 * 60),
            cookie_secure: false,
        }
    }
}

impl SessionConfig {
    /// Cookie `Max-Age` in seconds, matching the session lifetime.
    pub fn cookie_max_age_secs(&self) -> i64 {
        self.session_lifetime.num_seconds()
    }
}
