// Session module - practice flow around the grader
//
// 1. LabelSequence: which signs to practice and in what order
// 2. PracticeStatus: IDLE / IN_PROGRESS / ACCEPTED / ADVANCING
// 3. PracticeSession: owns the grader and the current target label

pub mod labels;
pub mod practice;
pub mod state;

pub use labels::LabelSequence;
pub use practice::{PracticeSession, SessionSnapshot};
pub use state::PracticeStatus;
