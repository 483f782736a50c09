use std::sync::{Arc, OnceLock};

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as ArgonPasswordHasher, SaltString};
use rand::rngs::OsRng;

use crate::config::HasherConfig;
use crate::{AuthError, SecretString};

/// Default session token length in characters (~190 bits of entropy).
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Plaintext hashed once per hasher to produce the dummy hash used when a
/// login names an account that does not exist.
const DUMMY_PASSWORD: &str = "forum-auth-dummy-password";

/// Trait for password hashing and verification.
///
/// Implementations are CPU-bound; callers run them on a blocking thread.
///
/// ```rust
/// use forum_auth::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new(8192, 1, 1);
/// let hash = hasher.hash("longenough1").unwrap();
/// assert!(hasher.verify("longenough1", &hash).unwrap());
/// assert!(!hasher.verify("wrongpassword", &hash).unwrap());
/// ```
pub trait PasswordHasher: Clone + Send + Sync + 'static {
    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if the hash is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// A valid hash of an unguessable password, produced with the same cost
    /// parameters as [`hash`](Self::hash).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHashError` if hashing fails.
    fn dummy_hash(&self) -> Result<String, AuthError>;
}

/// Argon2id password hasher with configurable parameters.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    config: HasherConfig,
    dummy: Arc<OnceLock<String>>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::from_config(HasherConfig::default())
    }
}

impl Argon2Hasher {
    /// Creates a new hasher with custom parameters.
    ///
    /// * `memory_cost` - Memory usage in KiB
    /// * `time_cost` - Number of iterations
    /// * `parallelism` - Number of lanes
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self::from_config(HasherConfig {
            memory_cost,
            time_cost,
            parallelism,
        })
    }

    /// Builds the hasher and computes its dummy hash up front, so the first
    /// login for an unknown account costs the same as every later one.
    ///
    /// Invalid cost parameters leave the dummy unset; the error then surfaces
    /// from the first [`hash`](PasswordHasher::hash) or
    /// [`dummy_hash`](PasswordHasher::dummy_hash) call.
    #[must_use]
    pub fn from_config(config: HasherConfig) -> Self {
        let hasher = Self {
            config,
            dummy: Arc::new(OnceLock::new()),
        };
        if let Ok(hash) = hasher.hash(DUMMY_PASSWORD) {
            let _ = hasher.dummy.set(hash);
        }
        hasher
    }

    #[must_use]
    pub fn production() -> Self {
        Self::from_config(HasherConfig::production())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            None,
        )
        .map_err(|_| AuthError::PasswordHashError)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;

        // params come from the PHC string, not from config
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn dummy_hash(&self) -> Result<String, AuthError> {
        if let Some(hash) = self.dummy.get() {
            return Ok(hash.clone());
        }

        let hash = self.hash(DUMMY_PASSWORD)?;
        // a concurrent caller may have won the race; either value is valid
        Ok(self.dummy.get_or_init(|| hash).clone())
    }
}

/// Hashes on tokio's blocking pool so the async workers are not stalled.
///
/// # Errors
///
/// `PasswordHashError` from the hasher, `Internal` if the task panics.
pub async fn hash_password_blocking<H: PasswordHasher>(
    hasher: &H,
    password: &SecretString,
) -> Result<String, AuthError> {
    let hasher = hasher.clone();
    let password = password.clone();
    tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
        .await
        .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
}

/// Verifies `password` against `stored_hash` on the blocking pool, or
/// against the hasher's dummy hash when `stored_hash` is `None`.
///
/// The dummy branch always reports a mismatch but costs the same as a real
/// verification.
///
/// # Errors
///
/// `PasswordHashError` for a malformed hash, `Internal` if the task panics.
pub async fn verify_password_blocking<H: PasswordHasher>(
    hasher: &H,
    password: &SecretString,
    stored_hash: Option<String>,
) -> Result<bool, AuthError> {
    let hasher = hasher.clone();
    let password = password.clone();
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => hasher.verify(password.expose_secret(), &hash),
        None => {
            let dummy = hasher.dummy_hash()?;
            hasher.verify(password.expose_secret(), &dummy).map(|_| false)
        }
    })
    .await
    .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?
}

/// Generates a cryptographically secure alphanumeric token.
///
/// ```rust
/// use forum_auth::crypto::generate_token;
///
/// let token = generate_token(32);
/// assert_eq!(token.len(), 32);
/// ```
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// Generates a new opaque user id (UUID v4).
pub fn generate_user_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::new(8192, 1, 1)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("longenough1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("longenough1", &hash).unwrap());
        assert!(!hasher.verify("longenough2", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = fast_hasher();
        let a = hasher.hash("longenough1").unwrap();
        let b = hasher.hash("longenough1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = fast_hasher();
        assert_eq!(
            hasher.verify("longenough1", "not-a-phc-string").unwrap_err(),
            AuthError::PasswordHashError
        );
    }

    #[test]
    fn test_dummy_hash_is_cached_and_shared_between_clones() {
        let hasher = fast_hasher();
        let clone = hasher.clone();
        let first = hasher.dummy_hash().unwrap();
        let second = clone.dummy_hash().unwrap();
        assert_eq!(first, second);
        assert!(!hasher.verify("longenough1", &first).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_ready_after_construction() {
        let hasher = fast_hasher();
        let ready = hasher.dummy.get().cloned().unwrap();
        assert_eq!(hasher.dummy_hash().unwrap(), ready);
    }

    #[test]
    fn test_invalid_params_surface_on_use() {
        let hasher = Argon2Hasher::new(0, 0, 0);
        assert!(hasher.dummy.get().is_none());
        assert_eq!(hasher.dummy_hash().unwrap_err(), AuthError::PasswordHashError);
    }

    #[test]
    fn test_dummy_hash_uses_configured_cost() {
        let hasher = fast_hasher();
        let dummy = hasher.dummy_hash().unwrap();
        assert!(dummy.contains("m=8192,t=1,p=1"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hasher = fast_hasher();
        let password = SecretString::new("longenough1");

        let hash = hash_password_blocking(&hasher, &password).await.unwrap();
        assert!(verify_password_blocking(&hasher, &password, Some(hash)).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_without_stored_hash_never_matches() {
        let hasher = fast_hasher();
        let password = SecretString::new(DUMMY_PASSWORD);

        assert!(!verify_password_blocking(&hasher, &password, None).await.unwrap());
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(DEFAULT_TOKEN_LENGTH);
        assert_eq!(token.len(), DEFAULT_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_token(32), generate_token(32));
    }

    #[test]
    fn test_generate_user_id() {
        let id = generate_user_id();
        assert_eq!(id.len(), 36);
        assert_ne!(id, generate_user_id());
    }
}
