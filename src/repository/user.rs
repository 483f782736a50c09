use async_trait::async_trait;
use serde::Serialize;

use crate::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Validated account fields with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub(crate) fn into_user(self, id: String) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            nickname: self.nickname,
            age: self.age,
            gender: self.gender,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

/// The account key a login form names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Email(String),
    Nickname(String),
}

impl LoginIdentifier {
    /// Builds an identifier from the form's `loginType` and value.
    ///
    /// Returns `None` for an unknown login type.
    pub fn from_kind(kind: &str, value: impl Into<String>) -> Option<Self> {
        match kind {
            "email" => Some(Self::Email(value.into())),
            "nickname" => Some(Self::Nickname(value.into())),
            _ => None,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Email(value) | Self::Nickname(value) => value,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Nickname(_) => "nickname",
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AuthError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    async fn find_user_by_nickname(&self, nickname: &str) -> Result<Option<User>, AuthError>;

    /// Persists a new account and assigns its id.
    ///
    /// Must fail with `DuplicateEmail` or `DuplicateNickname` without writing
    /// a row when either key is already taken, including when a concurrent
    /// insert wins the race.
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError>;

    async fn find_user_by_identifier(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<User>, AuthError> {
        match identifier {
            LoginIdentifier::Email(email) => self.find_user_by_email(email).await,
            LoginIdentifier::Nickname(nickname) => self.find_user_by_nickname(nickname).await,
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl User {
    pub fn mock() -> Self {
        User {
            id: "00000000-0000-4000-8000-000000000001".to_owned(),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            nickname: "tester".to_owned(),
            age: 30,
            gender: "other".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: "fakehashedpassword".to_owned(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl NewUser {
    pub fn mock(nickname: &str, email: &str, password_hash: &str) -> Self {
        NewUser {
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            nickname: nickname.to_owned(),
            age: 30,
            gender: "other".to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
        }
    }
}
