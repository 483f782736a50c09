//! Signup field validation.
//!
//! Each validator checks one field and returns the first rule it violates.
//! [`validate_signup`] runs them all in form order.

mod age;
mod email;
mod name;
mod nickname;
mod password;

pub use age::{MAX_AGE, MIN_AGE, parse_age};
pub use email::validate_email;
pub use name::validate_required;
pub use nickname::validate_nickname;
pub use password::PasswordPolicy;

use crate::SecretString;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    FieldRequired(&'static str),
    #[error("{0} is too long (max 100 characters)")]
    FieldTooLong(&'static str),
    #[error("Nickname must be between 3-16 characters")]
    NicknameTooShort,
    #[error("Nickname must be between 3-16 characters")]
    NicknameTooLong,
    #[error("Nickname may only contain letters, digits, '_' and '-'")]
    NicknameInvalidFormat,
    #[error("Age must be a whole number")]
    AgeNotANumber,
    #[error("Age must be between 13-100")]
    AgeOutOfRange,
    #[error("Email cannot be empty")]
    EmailEmpty,
    #[error("Email is too long (max 254 characters)")]
    EmailTooLong,
    #[error("Invalid email format")]
    EmailInvalidFormat,
    #[error("Password cannot be empty")]
    PasswordEmpty,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Password is too long (max {0} characters)")]
    PasswordTooLong(usize),
    #[error("Password is too common")]
    PasswordDisallowed,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Request body must be form data")]
    UnsupportedFormEncoding,
    #[error("Malformed form data")]
    MalformedForm,
}

/// Raw signup fields as submitted, before trimming or parsing.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Signup fields after validation: trimmed, with the age parsed.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
    pub password: SecretString,
}

/// Validates every signup field in form order.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate_signup(
    form: &SignupForm,
    policy: &PasswordPolicy,
) -> Result<ValidSignup, ValidationError> {
    let first_name = validate_required("First name", &form.first_name)?;
    let last_name = validate_required("Last name", &form.last_name)?;
    let nickname = validate_nickname(&form.nickname)?;
    let age = parse_age(&form.age)?;
    let gender = validate_required("Gender", &form.gender)?;
    let email = validate_email(&form.email)?;
    policy.validate(form.password.expose_secret())?;
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    Ok(ValidSignup {
        first_name,
        last_name,
        nickname,
        age,
        gender,
        email,
        password: form.password.clone(),
    })
}
