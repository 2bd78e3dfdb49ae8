// Practice session error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 4001-4004
pub struct SessionErrorCodes {}

impl SessionErrorCodes {
    /// Target label is empty or outside the enforced label sequence
    pub const INVALID_LABEL: i32 = 4001;

    /// Label sequence has no entries
    pub const EMPTY_LABEL_SEQUENCE: i32 = 4002;

    /// Label sequence lists the same label twice
    pub const DUPLICATE_LABEL: i32 = 4003;

    /// Advance requested before the current target was accepted
    pub const NOT_ACCEPTED: i32 = 4004;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=PracticeSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Practice session errors
///
/// These are surfaced to the caller as-is and never retried.
///
/// Error code range: 4001-4004
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Label is empty or not part of the configured sequence
    InvalidLabel { label: String },

    /// A label sequence must contain at least one label
    EmptyLabelSequence,

    /// Labels in a sequence must be unique
    DuplicateLabel { label: String },

    /// Only an accepted target may start advancing
    NotAccepted { status: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::InvalidLabel { .. } => SessionErrorCodes::INVALID_LABEL,
            SessionError::EmptyLabelSequence => SessionErrorCodes::EMPTY_LABEL_SEQUENCE,
            SessionError::DuplicateLabel { .. } => SessionErrorCodes::DUPLICATE_LABEL,
            SessionError::NotAccepted { .. } => SessionErrorCodes::NOT_ACCEPTED,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::InvalidLabel { label } if label.is_empty() => {
                "Invalid label: label must not be empty".to_string()
            }
            SessionError::InvalidLabel { label } => {
                format!("Invalid label: '{}' is not in the label sequence", label)
            }
            SessionError::EmptyLabelSequence => "Label sequence is empty".to_string(),
            SessionError::DuplicateLabel { label } => {
                format!("Duplicate label in sequence: '{}'", label)
            }
            SessionError::NotAccepted { status } => {
                format!("Cannot advance: current target is {}", status)
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}
