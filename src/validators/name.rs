use super::ValidationError;

/// Trims a free-text field and rejects it when empty or over 100 characters.
pub fn validate_required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::FieldRequired(field));
    }

    if trimmed.chars().count() > 100 {
        return Err(ValidationError::FieldTooLong(field));
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_values() {
        assert_eq!(validate_required("First name", "John").unwrap(), "John");
        assert_eq!(validate_required("First name", "  José ").unwrap(), "José");
        assert_eq!(validate_required("Gender", "名前").unwrap(), "名前");
    }

    #[test]
    fn test_empty() {
        assert_eq!(
            validate_required("Gender", "   ").unwrap_err(),
            ValidationError::FieldRequired("Gender")
        );
    }

    #[test]
    fn test_too_long() {
        let long = "a".repeat(101);
        assert_eq!(
            validate_required("Last name", &long).unwrap_err(),
            ValidationError::FieldTooLong("Last name")
        );
    }
}
