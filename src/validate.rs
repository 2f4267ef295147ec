//! Input validation for task fields.
//!
//! Priority parsing is deliberately asymmetric: the add path substitutes
//! `medium` for an unknown value with a warning, while the update path
//! rejects it outright.

use crate::error::{Error, Result};
use crate::task::Priority;

/// Trim a text input and enforce its maximum length in characters.
///
/// Empty strings pass; callers that require a non-empty value (title)
/// enforce that themselves.
pub fn validate_text(value: &str, max_length: usize, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_length {
        return Err(Error::Validation(format!(
            "{field_name} exceeds maximum length of {max_length} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a priority for the add path: unknown values fall back to medium
pub fn lenient_priority(value: &str) -> Priority {
    match value.parse() {
        Ok(priority) => priority,
        Err(()) => {
            tracing::warn!("invalid priority '{value}', defaulting to 'medium'");
            Priority::Medium
        }
    }
}

/// Parse a priority for the update path: unknown values are an error
pub fn strict_priority(value: &str) -> Result<Priority> {
    value.parse().map_err(|()| {
        Error::Validation("Priority must be one of: low, medium, high".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let value = validate_text("  buy milk  ", 20, "Title").unwrap();
        assert_eq!(value, "buy milk");
    }

    #[test]
    fn allows_empty_values() {
        assert_eq!(validate_text("   ", 10, "Description").unwrap(), "");
    }

    #[test]
    fn rejects_over_length_after_trim() {
        let err = validate_text("abcdef", 5, "Title").unwrap_err();
        assert!(err.to_string().contains("maximum length of 5"));
        // Length is measured after trimming
        assert!(validate_text("  abcde  ", 5, "Title").is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(validate_text("héllo", 5, "Title").is_ok());
    }

    #[test]
    fn lenient_priority_falls_back_to_medium() {
        assert_eq!(lenient_priority("high"), Priority::High);
        assert_eq!(lenient_priority("urgent"), Priority::Medium);
        assert_eq!(lenient_priority(""), Priority::Medium);
    }

    #[test]
    fn strict_priority_rejects_unknown_values() {
        assert_eq!(strict_priority("low").unwrap(), Priority::Low);
        assert!(strict_priority("urgent").is_err());
        assert!(strict_priority("").is_err());
    }
}
