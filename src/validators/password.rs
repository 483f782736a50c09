use super::ValidationError;

/// Password rules applied at signup.
///
/// ```
/// use forum_auth::validators::PasswordPolicy;
///
/// let policy = PasswordPolicy::default();
/// assert!(policy.validate("longenough1").is_ok());
/// assert!(policy.validate("Password").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum length in characters (default: 8)
    pub min_length: usize,
    /// Maximum length in characters (default: 128)
    pub max_length: usize,
    /// Rejected regardless of case
    pub disallowed_passwords: Vec<String>,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            disallowed_passwords: vec!["password".to_owned()],
        }
    }
}

impl PasswordPolicy {
    #[must_use]
    pub fn min(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    #[must_use]
    pub fn disallow(mut self, password: impl Into<String>) -> Self {
        self.disallowed_passwords.push(password.into());
        self
    }

    /// # Errors
    ///
    /// Returns the first rule the password breaks.
    pub fn validate(&self, password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::PasswordEmpty);
        }

        let len = password.chars().count();
        if len < self.min_length {
            return Err(ValidationError::PasswordTooShort(self.min_length));
        }
        if len > self.max_length {
            return Err(ValidationError::PasswordTooLong(self.max_length));
        }

        if self
            .disallowed_passwords
            .iter()
            .any(|disallowed| disallowed.eq_ignore_ascii_case(password))
        {
            return Err(ValidationError::PasswordDisallowed);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("longenough1").is_ok());
        assert_eq!(policy.validate("").unwrap_err(), ValidationError::PasswordEmpty);
        assert_eq!(policy.validate("short").unwrap_err(), ValidationError::PasswordTooShort(8));
        assert_eq!(
            policy.validate(&"a".repeat(129)).unwrap_err(),
            ValidationError::PasswordTooLong(128)
        );
    }

    #[test]
    fn test_disallowed_is_case_insensitive() {
        let policy = PasswordPolicy::default().disallow("letmein123");
        assert_eq!(policy.validate("PASSWORD").unwrap_err(), ValidationError::PasswordDisallowed);
        assert_eq!(policy.validate("LetMeIn123").unwrap_err(), ValidationError::PasswordDisallowed);
    }

    #[test]
    fn test_custom_min() {
        let policy = PasswordPolicy::default().min(12);
        assert!(policy.validate("elevenchars").is_err());
        assert!(policy.validate("twelve chars").is_ok());
    }
}
