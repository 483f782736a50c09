//! Configuration for the forum auth server.
//!
//! # Example
//!
//! ```rust
//! use forum_auth::config::{ForumConfig, HasherConfig};
//!
//! let config = ForumConfig {
//!     hasher: HasherConfig { memory_cost: 65536, time_cost: 3, parallelism: 4 },
//!     ..ForumConfig::default()
//! };
//! assert_eq!(config.session.session_lifetime, chrono::Duration::hours(24));
//! ```

use std::str::FromStr;

pub use crate::session::SessionConfig;
use crate::AuthError;

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ForumConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// `SQLite` connection string.
    pub database_url: String,

    pub session: SessionConfig,

    pub hasher: HasherConfig,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_owned(),
            database_url: "sqlite:./forum.db?mode=rwc".to_owned(),
            session: SessionConfig::default(),
            hasher: HasherConfig::default(),
        }
    }
}

impl ForumConfig {
    /// Local development: in-memory database, cheap hashing.
    pub fn development() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            database_url: "sqlite::memory:".to_owned(),
            session: SessionConfig::default(),
            hasher: HasherConfig {
                memory_cost: 8192,
                time_cost: 1,
                parallelism: 1,
            },
        }
    }

    /// Secure cookies and OWASP-level Argon2 parameters.
    pub fn strict() -> Self {
        Self {
            session: SessionConfig {
                cookie_secure: true,
                ..SessionConfig::default()
            },
            hasher: HasherConfig::production(),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment on top of the defaults.
    ///
    /// Recognised variables: `FORUM_BIND_ADDR`, `DATABASE_URL`,
    /// `FORUM_COOKIE_SECURE`, `FORUM_SWEEP_INTERVAL_SECS`,
    /// `FORUM_ARGON2_MEMORY_KIB`, `FORUM_ARGON2_ITERATIONS`.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("FORUM_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(secure) = parse_var::<bool, _>(&lookup, "FORUM_COOKIE_SECURE")? {
            config.session.cookie_secure = secure;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "FORUM_SWEEP_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(AuthError::ConfigurationError(
                    "FORUM_SWEEP_INTERVAL_SECS must be greater than zero".to_owned(),
                ));
            }
            config.session.sweep_interval = std::time::Duration::from_secs(secs);
        }
        if let Some(memory) = parse_var::<u32, _>(&lookup, "FORUM_ARGON2_MEMORY_KIB")? {
            config.hasher.memory_cost = memory;
        }
        if let Some(iterations) = parse_var::<u32, _>(&lookup, "FORUM_ARGON2_ITERATIONS")? {
            config.hasher.time_cost = iterations;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AuthError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                AuthError::ConfigurationError(format!("{key} has an invalid value: {raw}"))
            })
        })
        .transpose()
}

/// Argon2id cost parameters used when hashing new passwords.
///
/// Verification always uses the parameters embedded in the stored hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    /// Memory usage in KiB.
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // argon2 crate default, 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HasherConfig {
    /// 64 MiB, 3 iterations, 4 lanes.
    pub fn production() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ForumConfig::default();
        assert_eq!(config.session.session_lifetime, Duration::hours(24));
        assert_eq!(config.session.presence_window, Duration::minutes(5));
        assert!(!config.session.cookie_secure);
        assert_eq!(config.hasher, HasherConfig::default());
    }

    #[test]
    fn test_strict_config() {
        let config = ForumConfig::strict();
        assert!(config.session.cookie_secure);
        assert_eq!(config.hasher.memory_cost, 65536);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ForumConfig::from_lookup(lookup_from(&[
            ("FORUM_BIND_ADDR", "127.0.0.1:9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("FORUM_COOKIE_SECURE", "true"),
            ("FORUM_SWEEP_INTERVAL_SECS", "60"),
            ("FORUM_ARGON2_ITERATIONS", "4"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.session.cookie_secure);
        assert_eq!(config.session.sweep_interval.as_secs(), 60);
        assert_eq!(config.hasher.time_cost, 4);
        assert_eq!(config.hasher.memory_cost, HasherConfig::default().memory_cost);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = ForumConfig::from_lookup(lookup_from(&[("FORUM_COOKIE_SECURE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, AuthError::ConfigurationError(_)));

        let err = ForumConfig::from_lookup(lookup_from(&[("FORUM_SWEEP_INTERVAL_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, AuthError::ConfigurationError(_)));
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = ForumConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, ForumConfig::default().bind_addr);
    }
}
