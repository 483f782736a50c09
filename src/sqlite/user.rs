use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use super::database_error;
use crate::crypto::generate_user_id;
use crate::{AuthError, NewUser, User, UserRepository};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: String,
    first_name: String,
    last_name: String,
    nickname: String,
    age: i64,
    gender: String,
    email: String,
    password_hash: String,
}

impl TryFrom<UserRecord> for User {
    type Error = AuthError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        let age = u8::try_from(row.age)
            .map_err(|_| AuthError::DatabaseError(format!("stored age out of range: {}", row.age)))?;

        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            nickname: row.nickname,
            age,
            gender: row.gender,
            email: row.email,
            password_hash: row.password_hash,
        })
    }
}

const SELECT_USER: &str = "SELECT id, first_name, last_name, nickname, age, gender, email, password_hash FROM users";

/// Maps a failed insert, turning the `UNIQUE` constraint on either key into
/// the matching duplicate error.
fn insert_error(e: &sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = e {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.email") {
                return AuthError::DuplicateEmail;
            }
            if message.contains("users.nickname") {
                return AuthError::DuplicateNickname;
            }
        }
    }

    database_error("create_user", e)
}

impl SqliteUserRepository {
    async fn find_one(
        &self,
        column: &'static str,
        value: &str,
        operation: &'static str,
    ) -> Result<Option<User>, AuthError> {
        let row: Option<UserRecord> = sqlx::query_as(&format!("{SELECT_USER} WHERE {column} = ?"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error(operation, &e))?;

        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
        self.find_one("id", id, "find_user_by_id").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, email), err))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.find_one("email", email, "find_user_by_email").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_user_by_nickname(&self, nickname: &str) -> Result<Option<User>, AuthError> {
        self.find_one("nickname", nickname, "find_user_by_nickname").await
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, user), err))]
    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let user = user.into_user(generate_user_id());

        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, nickname, age, gender, email, password_hash) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.nickname)
        .bind(i64::from(user.age))
        .bind(&user.gender)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(&e))?;

        Ok(user)
    }
}
