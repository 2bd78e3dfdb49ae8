// SignGrader - rolling-window accept/reject decision for one target sign
//
// Each submitted similarity is clamped, buffered and graded twice:
// 1. Tier: the instantaneous quality of this one sample.
// 2. Acceptance: a smoothed decision over the buffer. Accepted when either
//    - pass_count >= ceil(capacity * acceptance_fraction), or
//    - median >= T - median_slack
//
// Tier and acceptance are independent and may disagree: a buffer full of
// passing samples stays accepted even when the newest frame is a TRY.

use serde::{Deserialize, Serialize};

use crate::error::{log_grading_error, GradingError};
use crate::grading::buffer::SimilarityBuffer;
use crate::grading::config::GradingConfig;
use crate::grading::tier::Tier;

/// Outcome of grading a single submitted sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Clamped similarity, `None` for a no-signal frame
    pub similarity: Option<f32>,
    /// Quality tier of this sample
    pub tier: Tier,
    /// Smoothed acceptance over the buffer
    pub accepted: bool,
    /// Buffered samples at or above the threshold
    pub pass_count: usize,
    /// Lower median of the buffer, `None` when empty
    pub median: Option<f32>,
    /// Effective threshold used for this grade
    pub threshold: f32,
    /// Buffer contents after this sample, oldest first
    pub buffer_snapshot: Vec<f32>,
}

impl GradeResult {
    fn no_signal(threshold: f32) -> Self {
        Self {
            similarity: None,
            tier: Tier::NoSignal,
            accepted: false,
            pass_count: 0,
            median: None,
            threshold,
            buffer_snapshot: Vec::new(),
        }
    }
}

/// Clamp a raw classifier score into [0, 1]
///
/// NaN maps to 0.0 so a garbage frame counts as a miss rather than a pass.
pub fn clamp_similarity(raw: f32) -> f32 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Sign-match grader owning its buffer and configuration
#[derive(Debug, Clone)]
pub struct SignGrader {
    config: GradingConfig,
    buffer: SimilarityBuffer,
}

impl SignGrader {
    /// Create a grader, validating the configuration first
    ///
    /// # Errors
    /// `GradingError::InvalidConfig` if any parameter is out of range
    pub fn new(config: GradingConfig) -> Result<Self, GradingError> {
        config
            .validate()
            .inspect_err(|err| log_grading_error(err, "new"))?;
        let buffer = SimilarityBuffer::new(config.buffer_capacity);
        Ok(Self { config, buffer })
    }

    /// Grade one frame
    ///
    /// `None` means the classifier found no usable signal: the buffer is
    /// cleared so stale history cannot carry a brief occlusion.
    pub fn submit(&mut self, similarity: Option<f32>) -> GradeResult {
        let threshold = self.config.effective_threshold();

        let raw = match similarity {
            Some(raw) => raw,
            None => {
                self.buffer.clear();
                return GradeResult::no_signal(threshold);
            }
        };

        let sample = clamp_similarity(raw);
        if sample != raw {
            log::debug!(
                "[SignGrader] Clamped out-of-range similarity {} to {}",
                raw,
                sample
            );
        }
        self.buffer.push(sample);

        let tier = Tier::classify(sample, threshold, &self.config.tier_bands);
        let pass_count = self.buffer.pass_count(threshold);
        let median = self.buffer.median();

        let by_count = pass_count >= self.config.required_passes();
        let by_median = median
            .map(|m| m >= threshold - self.config.median_slack)
            .unwrap_or(false);

        GradeResult {
            similarity: Some(sample),
            tier,
            accepted: by_count || by_median,
            pass_count,
            median,
            threshold,
            buffer_snapshot: self.buffer.snapshot(),
        }
    }

    /// Drop all buffered samples
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Swap in a new configuration, keeping the newest buffered samples
    ///
    /// # Errors
    /// `GradingError::InvalidConfig`; the current configuration is kept
    pub fn reconfigure(&mut self, config: GradingConfig) -> Result<(), GradingError> {
        config
            .validate()
            .inspect_err(|err| log_grading_error(err, "reconfigure"))?;
        self.buffer.resize(config.buffer_capacity);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn threshold(&self) -> f32 {
        self.config.effective_threshold()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_snapshot(&self) -> Vec<f32> {
        self.buffer.snapshot()
    }
}
