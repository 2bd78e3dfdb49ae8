// Sign Trainer Core - sign-language practice grading
// Rolling-window grading of classifier similarity scores and practice flow

// Module declarations
pub mod config;
pub mod error;
pub mod fixtures;
pub mod grading;
pub mod runner;
pub mod session;
pub mod telemetry;

// Re-exports for convenience
pub use config::{AppConfig, PracticeConfig};
pub use error::{ErrorCode, GradingError, SessionError};
pub use grading::{GradeResult, GradingConfig, SignGrader, Tier};
pub use runner::{PracticeEvent, PracticeRunner};
pub use session::{LabelSequence, PracticeSession, PracticeStatus, SessionSnapshot};

/// Install the `tracing` fmt subscriber
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    if tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
    {
        log::info!("Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }

    #[test]
    fn test_reexports_wire_together() {
        let mut session = AppConfig::default().build_session().unwrap();
        let result: GradeResult = session.submit(Some(0.99));
        assert_eq!(result.tier, Tier::Perfect);
        assert_eq!(session.status(), PracticeStatus::Accepted);
    }
}
