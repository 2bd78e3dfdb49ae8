// Grading module - turns classifier similarity scores into feedback
//
// Components:
// 1. GradingConfig: thresholds, buffer size and tier bands
// 2. SimilarityBuffer: bounded rolling window of recent samples
// 3. SignGrader: per-sample tier plus smoothed accept/reject decision
// 4. SimilarityScorer: contract for the external classifier

pub mod buffer;
pub mod config;
pub mod grader;
pub mod scorer;
pub mod tier;

pub use buffer::SimilarityBuffer;
pub use config::{GradingConfig, TierBands};
pub use grader::{clamp_similarity, GradeResult, SignGrader};
pub use scorer::{EvalResponse, ScriptedScorer, SimilarityScorer};
pub use tier::{Tier, ACCEPTED_FEEDBACK};
