#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::user::{NewUser, User, UserRepository};
use crate::AuthError;
use crate::crypto::generate_user_id;

/// In-memory user store; uniqueness is checked and the row inserted under one
/// lock acquisition.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_nickname(&self, nickname: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.nickname == nickname).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        if users.iter().any(|u| u.nickname == user.nickname) {
            return Err(AuthError::DuplicateNickname);
        }

        let user = user.into_user(generate_user_id());
        users.push(user.clone());
        drop(users);

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MockUserRepository::new();
        let user = repo
            .create_user(NewUser::mock("alice", "a@x.com", "hash"))
            .await
            .unwrap();

        assert_eq!(repo.find_user_by_id(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(repo.find_user_by_email("a@x.com").await.unwrap(), Some(user.clone()));
        assert_eq!(repo.find_user_by_nickname("alice").await.unwrap(), Some(user));
        assert!(repo.find_user_by_nickname("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_write_nothing() {
        let repo = MockUserRepository::new();
        repo.create_user(NewUser::mock("alice", "a@x.com", "hash"))
            .await
            .unwrap();

        let err = repo
            .create_user(NewUser::mock("alice2", "a@x.com", "hash"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::DuplicateEmail);

        let err = repo
            .create_user(NewUser::mock("alice", "other@x.com", "hash"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::DuplicateNickname);

        assert_eq!(repo.len(), 1);
    }
}
