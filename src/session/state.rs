// PracticeStatus - per-target practice state
//
//   IDLE --submit(non-null)--> IN_PROGRESS --accepted--> ACCEPTED
//   ACCEPTED --mark_advancing--> ADVANCING --set_target--> IDLE
//   any --reset--> IDLE

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PracticeStatus {
    /// Nothing evaluated yet for the current target
    Idle,
    /// Receiving samples, not yet accepted
    InProgress,
    /// Last submit was accepted
    Accepted,
    /// Accepted and waiting for the caller to move to the next target
    Advancing,
}

impl PracticeStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            PracticeStatus::Idle => "IDLE",
            PracticeStatus::InProgress => "IN_PROGRESS",
            PracticeStatus::Accepted => "ACCEPTED",
            PracticeStatus::Advancing => "ADVANCING",
        }
    }

    /// Status after a graded sample
    ///
    /// `had_signal` is false for no-signal frames, which never start a run
    /// from IDLE. While ADVANCING the status is held until the target
    /// changes.
    pub fn after_grade(self, had_signal: bool, accepted: bool) -> PracticeStatus {
        match self {
            PracticeStatus::Advancing => PracticeStatus::Advancing,
            PracticeStatus::Idle if !had_signal => PracticeStatus::Idle,
            _ if accepted => PracticeStatus::Accepted,
            _ => PracticeStatus::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_transitions() {
        let s = PracticeStatus::Idle;
        assert_eq!(s.after_grade(false, false), PracticeStatus::Idle);
        assert_eq!(s.after_grade(true, false), PracticeStatus::InProgress);
        assert_eq!(s.after_grade(true, true), PracticeStatus::Accepted);
    }

    #[test]
    fn test_in_progress_transitions() {
        let s = PracticeStatus::InProgress;
        assert_eq!(s.after_grade(true, false), PracticeStatus::InProgress);
        assert_eq!(s.after_grade(true, true), PracticeStatus::Accepted);
        assert_eq!(s.after_grade(false, false), PracticeStatus::InProgress);
    }

    #[test]
    fn test_accepted_drops_back_on_reject() {
        let s = PracticeStatus::Accepted;
        assert_eq!(s.after_grade(true, true), PracticeStatus::Accepted);
        assert_eq!(s.after_grade(false, false), PracticeStatus::InProgress);
    }

    #[test]
    fn test_advancing_is_sticky() {
        let s = PracticeStatus::Advancing;
        assert_eq!(s.after_grade(true, false), PracticeStatus::Advancing);
        assert_eq!(s.after_grade(false, false), PracticeStatus::Advancing);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&PracticeStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(PracticeStatus::Advancing.display_name(), "ADVANCING");
    }
}
