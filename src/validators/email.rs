use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Trims an email address and checks its shape. Returns the trimmed value.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();

    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(email.to_owned())
}
