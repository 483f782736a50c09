use crate::crypto::{PasswordHasher, verify_password_blocking};
use crate::{AuthError, LoginIdentifier, SecretString, User, UserRepository};

/// Checks a login identifier and password against the stored hash.
///
/// An unknown identifier and a wrong password are indistinguishable to the
/// caller: both return [`AuthError::InvalidCredentials`], and both pay for one
/// Argon2 verification (against a dummy hash when no user matched).
pub struct VerifyCredentialsAction<U, H> {
    repository: U,
    hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> VerifyCredentialsAction<U, H> {
    pub fn new(repository: U, hasher: H) -> Self {
        Self { repository, hasher }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "verify_credentials", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identifier: &LoginIdentifier,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        let user = self.repository.find_user_by_identifier(identifier).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        let matched = verify_password_blocking(&self.hasher, password, stored_hash).await?;

        match user {
            Some(user) if matched => Ok(user),
            _ => {
                log::warn!(
                    target: "forum_auth",
                    "msg=\"credential check failed\", login_type=\"{}\"",
                    identifier.kind()
                );
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::crypto::Argon2Hasher;
    use crate::{MockUserRepository, NewUser};

    #[derive(Clone)]
    struct CountingHasher {
        inner: Argon2Hasher,
        verifies: Arc<AtomicUsize>,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            self.inner.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            self.verifies.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(password, hash)
        }

        fn dummy_hash(&self) -> Result<String, AuthError> {
            self.inner.dummy_hash()
        }
    }

    async fn counting_setup() -> (
        VerifyCredentialsAction<MockUserRepository, CountingHasher>,
        Arc<AtomicUsize>,
    ) {
        let verifies = Arc::new(AtomicUsize::new(0));
        let hasher = CountingHasher {
            inner: Argon2Hasher::new(8192, 1, 1),
            verifies: verifies.clone(),
        };
        let repo = MockUserRepository::new();
        let hash = hasher.hash("longenough1").unwrap();
        repo.create_user(NewUser::mock("alice", "a@x.com", &hash))
            .await
            .unwrap();
        (VerifyCredentialsAction::new(repo, hasher), verifies)
    }

    async fn setup() -> VerifyCredentialsAction<MockUserRepository, Argon2Hasher> {
        let hasher = Argon2Hasher::new(8192, 1, 1);
        let repo = MockUserRepository::new();
        let hash = hasher.hash("longenough1").unwrap();
        repo.create_user(NewUser::mock("alice", "a@x.com", &hash))
            .await
            .unwrap();
        VerifyCredentialsAction::new(repo, hasher)
    }

    #[tokio::test]
    async fn test_verify_by_email_and_nickname() {
        let action = setup().await;
        let password = SecretString::new("longenough1");

        let by_email = action
            .execute(&LoginIdentifier::Email("a@x.com".to_owned()), &password)
            .await
            .unwrap();
        let by_nickname = action
            .execute(&LoginIdentifier::Nickname("alice".to_owned()), &password)
            .await
            .unwrap();

        assert_eq!(by_email, by_nickname);
        assert_eq!(by_email.nickname, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let action = setup().await;

        let wrong_password = action
            .execute(
                &LoginIdentifier::Email("a@x.com".to_owned()),
                &SecretString::new("wrongpassword"),
            )
            .await
            .unwrap_err();
        let unknown_user = action
            .execute(
                &LoginIdentifier::Email("nobody@x.com".to_owned()),
                &SecretString::new("longenough1"),
            )
            .await
            .unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_user, wrong_password);
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_identifier_kind_is_respected() {
        let action = setup().await;

        // the nickname is not an email
        let err = action
            .execute(
                &LoginIdentifier::Email("alice".to_owned()),
                &SecretString::new("longenough1"),
            )
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unknown_identifier_verifies_once_against_dummy() {
        let (action, verifies) = counting_setup().await;

        let err = action
            .execute(
                &LoginIdentifier::Nickname("nobody".to_owned()),
                &SecretString::new("longenough1"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(verifies.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_verifies_once() {
        let (action, verifies) = counting_setup().await;

        let err = action
            .execute(
                &LoginIdentifier::Email("a@x.com".to_owned()),
                &SecretString::new("wrongpassword"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(verifies.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dummy_path_does_not_match_dummy_password() {
        let (action, verifies) = counting_setup().await;

        // whatever the dummy plaintext is, an unknown user never logs in
        let err = action
            .execute(
                &LoginIdentifier::Email("nobody@x.com".to_owned()),
                &SecretString::new("forum-auth-dummy-password"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(verifies.load(Ordering::SeqCst), 1);
    }
}
