// PracticeSession - current target tracking on top of the grader
//
// The session is the only writer of the current target label. Every target
// change goes through `set_target`, which clears the grader buffer and puts
// the status back to IDLE so history for one sign never counts toward the
// next.

use serde::{Deserialize, Serialize};

use crate::error::{log_session_error, GradingError, SessionError};
use crate::grading::{GradeResult, GradingConfig, SignGrader};
use crate::session::labels::LabelSequence;
use crate::session::state::PracticeStatus;

/// Read-only view of the session for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub target: String,
    pub status: PracticeStatus,
    pub threshold: f32,
    pub buffered: usize,
    pub completed: u32,
    pub last_result: Option<GradeResult>,
}

/// Sign practice session
pub struct PracticeSession {
    grader: SignGrader,
    labels: LabelSequence,
    enforce_sequence: bool,
    target: String,
    status: PracticeStatus,
    last_result: Option<GradeResult>,
    completed: u32,
}

impl PracticeSession {
    /// Create a session targeting the first label of `labels`
    ///
    /// # Arguments
    /// * `grading` - Grader configuration, validated here
    /// * `labels` - Practice order
    /// * `enforce_sequence` - Reject `set_target` labels outside `labels`
    pub fn new(
        grading: GradingConfig,
        labels: LabelSequence,
        enforce_sequence: bool,
    ) -> Result<Self, GradingError> {
        let grader = SignGrader::new(grading)?;
        let target = labels.first().to_string();
        Ok(Self {
            grader,
            labels,
            enforce_sequence,
            target,
            status: PracticeStatus::Idle,
            last_result: None,
            completed: 0,
        })
    }

    /// Grade one frame for the current target and update status
    pub fn submit(&mut self, similarity: Option<f32>) -> GradeResult {
        let result = self.grader.submit(similarity);
        let next = self
            .status
            .after_grade(result.similarity.is_some(), result.accepted);

        if next != self.status {
            log::debug!(
                "[PracticeSession] {}: {} -> {}",
                self.target,
                self.status.display_name(),
                next.display_name()
            );
        }
        self.status = next;
        self.last_result = Some(result.clone());
        result
    }

    /// Switch to `label`, clearing the buffer and returning to IDLE
    ///
    /// # Errors
    /// `SessionError::InvalidLabel` if the label is empty, or not in the
    /// sequence while the sequence is enforced
    pub fn set_target(&mut self, label: &str) -> Result<(), SessionError> {
        let rejected = label.trim().is_empty()
            || (self.enforce_sequence && !self.labels.contains(label));
        if rejected {
            let err = SessionError::InvalidLabel {
                label: label.to_string(),
            };
            log_session_error(&err, "set_target");
            return Err(err);
        }

        self.target = label.to_string();
        self.grader.reset();
        self.status = PracticeStatus::Idle;
        self.last_result = None;
        Ok(())
    }

    /// Label that follows the current target
    pub fn next_label(&self) -> &str {
        self.labels.next_after(&self.target)
    }

    /// Move to the next label in the sequence
    ///
    /// Counts the current target as completed when it had been accepted.
    /// Skipping an unaccepted target is allowed.
    ///
    /// # Returns
    /// The new target label
    pub fn advance(&mut self) -> Result<String, SessionError> {
        let was_accepted = matches!(
            self.status,
            PracticeStatus::Accepted | PracticeStatus::Advancing
        );
        let previous = self.target.clone();
        let next = self.next_label().to_string();

        self.set_target(&next)?;
        if was_accepted {
            self.completed += 1;
        }

        log::info!(
            "[PracticeSession] Advanced {} -> {} (completed={})",
            previous,
            next,
            self.completed
        );
        Ok(next)
    }

    /// ACCEPTED -> ADVANCING
    ///
    /// # Errors
    /// `SessionError::NotAccepted` from any other state
    pub fn mark_advancing(&mut self) -> Result<(), SessionError> {
        match self.status {
            PracticeStatus::Accepted => {
                self.status = PracticeStatus::Advancing;
                Ok(())
            }
            PracticeStatus::Advancing => Ok(()),
            other => {
                let err = SessionError::NotAccepted {
                    status: other.display_name().to_string(),
                };
                log_session_error(&err, "mark_advancing");
                Err(err)
            }
        }
    }

    /// Drop all history for the current target and return to IDLE
    pub fn reset(&mut self) {
        self.grader.reset();
        self.status = PracticeStatus::Idle;
        self.last_result = None;
    }

    /// Apply a new user leniency offset; buffered history is kept
    pub fn set_user_tune(&mut self, offset: f32) -> Result<(), GradingError> {
        let config = self.grader.config().with_user_tune(offset)?;
        self.grader.reconfigure(config)
    }

    /// Record whether a personal reference exists for the target
    pub fn set_personal_reference(&mut self, present: bool) -> Result<(), GradingError> {
        let config = self.grader.config().with_personal_reference(present)?;
        self.grader.reconfigure(config)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn status(&self) -> PracticeStatus {
        self.status
    }

    pub fn labels(&self) -> &LabelSequence {
        &self.labels
    }

    pub fn grader(&self) -> &SignGrader {
        &self.grader
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            target: self.target.clone(),
            status: self.status,
            threshold: self.grader.threshold(),
            buffered: self.grader.buffered(),
            completed: self.completed,
            last_result: self.last_result.clone(),
        }
    }
}
