//! Input validation errors shared by the date, time and reminder parsers.

use thiserror::Error;

/// Errors raised while validating user-supplied values.
///
/// These are always returned before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid date format: {0}. Use DD-MM-YYYY or DD-MM.")]
    InvalidDateFormat(String),

    #[error("Invalid time format: {0}. Use HH:MM (00:00-23:59).")]
    InvalidTimeFormat(String),

    #[error("Invalid reminder days: {0}. Use comma-separated non-negative integers.")]
    InvalidReminderDays(String),
}

impl ValidationError {
    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidDateFormat(_) => "invalid_date",
            ValidationError::InvalidTimeFormat(_) => "invalid_time",
            ValidationError::InvalidReminderDays(_) => "invalid_days",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_input() {
        let err = ValidationError::InvalidDateFormat("32-13".to_string());
        assert!(err.to_string().contains("32-13"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ValidationError::InvalidTimeFormat(String::new()).kind(),
            "invalid_time"
        );
        assert_eq!(
            ValidationError::InvalidReminderDays(String::new()).kind(),
            "invalid_days"
        );
    }
}
