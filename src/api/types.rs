use serde::{Deserialize, Serialize};

use crate::validators::SignupForm;
use crate::{AuthError, LoginIdentifier, SecretString};

// Request DTOs

/// `POST /login` form body.
///
/// Field names are matched after lowercasing and removing underscores, so
/// `loginType`, `logintype` and `login_type` all land in `login_type`.
/// Fields default to empty so that a missing field is reported as a
/// validation error instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(rename = "logintype")]
    pub login_type: String,
    pub email: String,
    pub nickname: String,
    pub password: SecretString,
}

impl LoginRequest {
    /// Picks the identifier named by `loginType`.
    ///
    /// # Errors
    ///
    /// `Validation` for an unknown `loginType` or an empty identifier or
    /// password.
    pub fn identifier(&self) -> Result<LoginIdentifier, AuthError> {
        use crate::ValidationError::{FieldRequired, PasswordEmpty};

        let value = match self.login_type.as_str() {
            "email" => self.email.trim(),
            "nickname" => self.nickname.trim(),
            _ => return Err(FieldRequired("Login type").into()),
        };
        if value.is_empty() {
            return Err(if self.login_type == "email" {
                FieldRequired("Email").into()
            } else {
                FieldRequired("Nickname").into()
            });
        }
        if self.password.is_empty() {
            return Err(PasswordEmpty.into());
        }

        LoginIdentifier::from_kind(&self.login_type, value)
            .ok_or_else(|| FieldRequired("Login type").into())
    }
}

/// `POST /signup` form body. Field names are matched the same way as
/// [`LoginRequest`]: `firstName`, `firstname` and `first_name` are one field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub nickname: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub password: SecretString,
    #[serde(rename = "confirmpassword")]
    pub confirm_password: SecretString,
}

impl From<SignupRequest> for SignupForm {
    fn from(req: SignupRequest) -> Self {
        SignupForm {
            first_name: req.first_name,
            last_name: req.last_name,
            nickname: req.nickname,
            age: req.age,
            gender: req.gender,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
        }
    }
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub nickname: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: String,
    pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl AuthStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user_id: None,
            nickname: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<crate::User> for UserResponse {
    fn from(user: crate::User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            age: user.age,
            gender: user.gender,
            email: user.email,
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        if err.is_internal() {
            return ErrorResponse {
                error: "Internal server error".to_owned(),
                code: "INTERNAL_ERROR".to_owned(),
            };
        }

        let code = match &err {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::DuplicateNickname => "NICKNAME_TAKEN",
            AuthError::DuplicateEmail => "EMAIL_TAKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::PasswordHashError
            | AuthError::DatabaseError(_)
            | AuthError::ConfigurationError(_)
            | AuthError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse {
            error: err.to_string(),
            code: code.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    fn login(kind: &str, email: &str, nickname: &str, password: &str) -> LoginRequest {
        LoginRequest {
            login_type: kind.to_owned(),
            email: email.to_owned(),
            nickname: nickname.to_owned(),
            password: SecretString::new(password),
        }
    }

    #[test]
    fn test_login_identifier() {
        assert_eq!(
            login("email", " a@x.com ", "", "pw").identifier().unwrap(),
            LoginIdentifier::Email("a@x.com".to_owned())
        );
        assert_eq!(
            login("nickname", "", "alice", "pw").identifier().unwrap(),
            LoginIdentifier::Nickname("alice".to_owned())
        );
    }

    #[test]
    fn test_login_identifier_rejects_bad_input() {
        assert_eq!(
            login("phone", "a@x.com", "", "pw").identifier().unwrap_err(),
            AuthError::Validation(ValidationError::FieldRequired("Login type"))
        );
        assert_eq!(
            login("email", "", "alice", "pw").identifier().unwrap_err(),
            AuthError::Validation(ValidationError::FieldRequired("Email"))
        );
        assert_eq!(
            login("nickname", "", "alice", "").identifier().unwrap_err(),
            AuthError::Validation(ValidationError::PasswordEmpty)
        );
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let response = ErrorResponse::from(AuthError::DatabaseError("disk full".to_owned()));
        assert_eq!(response.error, "Internal server error");
        assert_eq!(response.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_client_error_codes() {
        let response = ErrorResponse::from(AuthError::InvalidCredentials);
        assert_eq!(response.error, "Invalid credentials");
        assert_eq!(response.code, "INVALID_CREDENTIALS");

        assert_eq!(ErrorResponse::from(AuthError::DuplicateEmail).code, "EMAIL_TAKEN");
    }

    #[test]
    fn test_auth_status_omits_absent_fields() {
        let json = serde_json::to_string(&AuthStatusResponse::anonymous()).unwrap();
        assert_eq!(json, r#"{"authenticated":false}"#);
    }
}
