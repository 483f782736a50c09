use super::VerifyCredentialsAction;
use crate::crypto::PasswordHasher;
use crate::session::{Session, SessionManager, SessionRepository};
use crate::{AuthError, LoginIdentifier, SecretString, User, UserRepository};

/// Verifies credentials and, on success, issues a new session.
pub struct LoginAction<U, S, H> {
    credentials: VerifyCredentialsAction<U, H>,
    sessions: SessionManager<S>,
}

impl<U, S, H> LoginAction<U, S, H>
where
    U: UserRepository,
    S: SessionRepository,
    H: PasswordHasher,
{
    pub fn new(user_repository: U, sessions: SessionManager<S>, hasher: H) -> Self {
        Self {
            credentials: VerifyCredentialsAction::new(user_repository, hasher),
            sessions,
        }
    }

    /// # Returns
    ///
    /// - `Ok((user, session))` - credentials matched, session stored
    /// - `Err(AuthError::InvalidCredentials)` - unknown user or wrong password;
    ///   no session is created
    /// - `Err(_)` - storage or hashing failure
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identifier: &LoginIdentifier,
        password: &SecretString,
    ) -> Result<(User, Session), AuthError> {
        let user = self.credentials.execute(identifier, password).await?;
        let session = self.sessions.issue(&user.id, &user.nickname).await?;

        log::info!(
            target: "forum_auth",
            "msg=\"login success\", user_id=\"{}\", login_type=\"{}\"",
            user.id,
            identifier.kind()
        );

        Ok((user, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Argon2Hasher;
    use crate::session::{InMemorySessionRepository, SessionConfig};
    use crate::{MockUserRepository, NewUser};

    #[tokio::test]
    async fn test_login_action() {
        let hasher = Argon2Hasher::new(8192, 1, 1);
        let user_repo = MockUserRepository::new();
        let session_repo = InMemorySessionRepository::new();
        let hash = hasher.hash("longenough1").unwrap();
        user_repo
            .create_user(NewUser::mock("alice", "a@x.com", &hash))
            .await
            .unwrap();

        let sessions = SessionManager::new(session_repo.clone(), &SessionConfig::default());
        let login = LoginAction::new(user_repo, sessions.clone(), hasher);

        let (user, session) = login
            .execute(
                &LoginIdentifier::Nickname("alice".to_owned()),
                &SecretString::new("longenough1"),
            )
            .await
            .unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.nickname, "alice");
        assert!(sessions.validate(&session.id).await.unwrap().is_some());

        let failed = login
            .execute(
                &LoginIdentifier::Email("a@x.com".to_owned()),
                &SecretString::new("wrongpassword"),
            )
            .await;
        assert_eq!(failed.unwrap_err(), AuthError::InvalidCredentials);
        assert_eq!(session_repo.len(), 1);
    }
}
