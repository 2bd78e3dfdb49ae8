// Grading error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Grading error code constants
///
/// Single source of truth for the numeric codes reported by
/// [`GradingError::code`].
///
/// Error code range: 3001
pub struct GradingErrorCodes {}

impl GradingErrorCodes {
    /// A grading parameter is out of range or not finite
    pub const INVALID_CONFIG: i32 = 3001;
}

/// Log a grading error with structured context
///
/// This function logs grading errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_grading_error(err: &GradingError, context: &str) {
    error!(
        "Grading error in {}: code={}, component=SignGrader, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Grading-related errors
///
/// Raised when a grader is constructed or reconfigured with parameters that
/// would change learning difficulty in ways nobody asked for. Values are
/// never clamped to make them fit.
///
/// Error code range: 3001
#[derive(Debug, Clone, PartialEq)]
pub enum GradingError {
    /// A configuration field failed validation
    InvalidConfig { field: String, reason: String },
}

impl GradingError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        GradingError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl ErrorCode for GradingError {
    fn code(&self) -> i32 {
        match self {
            GradingError::InvalidConfig { .. } => GradingErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            GradingError::InvalidConfig { field, reason } => {
                format!("Invalid grading config: {} {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GradingError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for GradingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grading_error_codes() {
        assert_eq!(
            GradingError::invalid("median_slack", "must be within [0, 1]").code(),
            3001
        );
    }

    #[test]
    fn test_grading_error_messages() {
        let err = GradingError::invalid("buffer_capacity", "must be at least 1 (got 0)");
        assert_eq!(
            err.message(),
            "Invalid grading config: buffer_capacity must be at least 1 (got 0)"
        );
    }

    #[test]
    fn test_grading_error_display() {
        let err = GradingError::invalid("base_threshold", "must be within (0, 1)");
        let display = format!("{}", err);
        assert!(display.contains("GradingError"));
        assert!(display.contains("3001"));
    }
}
