// Error types for the sign trainer
//
// This module defines custom error types for grading and practice session
// operations, providing structured error handling with error codes suitable
// for reporting across the UI boundary.

mod grading;
mod session;

pub use grading::{log_grading_error, GradingError, GradingErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling for
/// whichever front-end observes the practice session.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
