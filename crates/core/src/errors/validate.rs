//! Small validation combinators shared by config and newtypes

use super::types::{Error, Result};

/// Validation helpers returning `Error::Validation`
pub struct Validate;

impl Validate {
    /// Validate that a string is not empty once trimmed
    pub fn not_empty(value: &str, field_name: &str) -> Result<()> {
        if value.trim().is_empty() {
            Err(Error::validation(field_name, "cannot be empty"))
        } else {
            Ok(())
        }
    }

    /// Validate using a custom predicate
    pub fn with_predicate<T, F>(value: T, predicate: F, field_name: &str, message: &str) -> Result<T>
    where
        F: FnOnce(&T) -> bool,
    {
        if predicate(&value) {
            Ok(value)
        } else {
            Err(Error::validation(field_name, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_rejects_whitespace() {
        assert!(Validate::not_empty("  ", "name").is_err());
        assert!(Validate::not_empty("db", "name").is_ok());
    }

    #[test]
    fn test_with_predicate_reports_message() {
        let err = Validate::with_predicate(
            0u64,
            |v| *v > 0,
            "open_timeout_ms",
            "must be greater than zero",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'open_timeout_ms': must be greater than zero"
        );
    }
}
