use super::ValidationError;

pub const MIN_AGE: u8 = 13;
pub const MAX_AGE: u8 = 100;

/// Parses the submitted age and checks it lies in `13..=100`.
pub fn parse_age(raw: &str) -> Result<u8, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::FieldRequired("Age"));
    }

    let age: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::AgeNotANumber)?;

    u8::try_from(age)
        .ok()
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
        .ok_or(ValidationError::AgeOutOfRange)
}
