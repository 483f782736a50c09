use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

pub const MIN_NICKNAME_LENGTH: usize = 3;
pub const MAX_NICKNAME_LENGTH: usize = 16;

static NICKNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("nickname regex is valid")
});

/// Trims and validates a nickname: 3-16 characters of `[A-Za-z0-9_-]`.
pub fn validate_nickname(nickname: &str) -> Result<String, ValidationError> {
    let trimmed = nickname.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::FieldRequired("Nickname"));
    }

    let len = trimmed.chars().count();
    if len < MIN_NICKNAME_LENGTH {
        return Err(ValidationError::NicknameTooShort);
    }
    if len > MAX_NICKNAME_LENGTH {
        return Err(ValidationError::NicknameTooLong);
    }

    if !NICKNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::NicknameInvalidFormat);
    }

    Ok(trimmed.to_owned())
}
