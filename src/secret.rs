//! Redacting wrapper for passwords submitted through login and signup forms.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// A password (or other secret) that prints as `[REDACTED]`.
///
/// Form structs deserialize straight into this type so that logging a whole
/// request body never leaks the plaintext.
///
/// ```rust
/// use forum_auth::SecretString;
///
/// let password = SecretString::new("longenough1");
/// assert_eq!(format!("{password:?}"), "SecretString([REDACTED])");
/// assert_eq!(password.expose_secret(), "longenough1");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Use only where the plaintext is required, e.g. hashing.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}
