//! Error types for record validation

use thiserror::Error;

/// Errors raised when a form draft cannot become a record payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: &'static str },

    #[error("Field {field} is too long: {len} characters (max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_too_long() {
        let err = ValidationError::TooLong {
            field: "title",
            len: 120,
            max: 100,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("title"));
        assert!(msg.contains("120"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_validation_error_display_required() {
        let err = ValidationError::RequiredFieldMissing { field: "field" };
        assert_eq!(format!("{}", err), "Required field missing: field");
    }
}
