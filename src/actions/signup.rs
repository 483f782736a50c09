use crate::crypto::{PasswordHasher, hash_password_blocking};
use crate::validators::{PasswordPolicy, SignupForm, validate_signup};
use crate::{AuthError, NewUser, User, UserRepository};

/// Creates an account from a submitted signup form.
pub struct SignupAction<U, H> {
    repository: U,
    hasher: H,
    policy: PasswordPolicy,
}

impl<U: UserRepository, H: PasswordHasher> SignupAction<U, H> {
    pub fn new(repository: U, hasher: H) -> Self {
        Self {
            repository,
            hasher,
            policy: PasswordPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the form, checks email then nickname uniqueness, hashes the
    /// password and persists the user.
    ///
    /// # Returns
    ///
    /// - `Ok(user)` - account created
    /// - `Err(AuthError::Validation(_))` - a field is missing or malformed
    /// - `Err(AuthError::DuplicateEmail)` / `Err(AuthError::DuplicateNickname)`
    /// - `Err(_)` - storage or hashing failure
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "signup", skip_all, err)
    )]
    pub async fn execute(&self, form: &SignupForm) -> Result<User, AuthError> {
        let valid = validate_signup(form, &self.policy)?;

        if self.repository.find_user_by_email(&valid.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }
        if self
            .repository
            .find_user_by_nickname(&valid.nickname)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateNickname);
        }

        let password_hash = hash_password_blocking(&self.hasher, &valid.password).await?;

        let user = self
            .repository
            .create_user(NewUser {
                first_name: valid.first_name,
                last_name: valid.last_name,
                nickname: valid.nickname,
                age: valid.age,
                gender: valid.gender,
                email: valid.email,
                password_hash,
            })
            .await?;

        log::info!(
            target: "forum_auth",
            "msg=\"user created\", user_id=\"{}\", nickname=\"{}\"",
            user.id,
            user.nickname
        );

        Ok(user)
    }
}
