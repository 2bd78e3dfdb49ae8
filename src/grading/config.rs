// GradingConfig - tunable parameters for the sign-match grader
//
// Effective threshold:
//   T = base_threshold - (has_personal_reference ? calibration_bonus : 0) + user_tune_offset
// clamped to [0, 1]. Everything else in grading is expressed relative to T.

use serde::{Deserialize, Serialize};

use crate::error::GradingError;

/// Offsets above the effective threshold that separate the quality tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBands {
    /// `similarity >= T + perfect` is PERFECT
    pub perfect: f32,
    /// `similarity >= T + good` is GOOD
    pub good: f32,
    /// `similarity >= T + almost` is ALMOST, anything lower is TRY
    pub almost: f32,
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            perfect: 0.08,
            good: 0.05,
            almost: 0.0,
        }
    }
}

/// Grader configuration
///
/// Immutable once handed to a grader; runtime tuning produces a new value
/// through [`GradingConfig::with_user_tune`] or
/// [`GradingConfig::with_personal_reference`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Base similarity threshold, in (0, 1)
    pub base_threshold: f32,
    /// Subtracted from the threshold when a personalized reference exists
    pub calibration_bonus: f32,
    /// Whether the user recorded their own reference for the target
    pub has_personal_reference: bool,
    /// User-adjustable leniency, added to the threshold
    pub user_tune_offset: f32,
    /// Number of recent samples kept in the rolling buffer
    pub buffer_capacity: usize,
    /// Fraction of the buffer capacity that must pass the threshold
    pub acceptance_fraction: f32,
    /// Slack subtracted from the threshold for the median acceptance path
    pub median_slack: f32,
    /// Tier band offsets
    pub tier_bands: TierBands,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            base_threshold: 0.82,
            calibration_bonus: 0.03,
            has_personal_reference: false,
            user_tune_offset: 0.02,
            buffer_capacity: 8,
            acceptance_fraction: 0.5,
            median_slack: 0.02,
            tier_bands: TierBands::default(),
        }
    }
}

impl GradingConfig {
    /// Effective threshold `T`, clamped to [0, 1]
    pub fn effective_threshold(&self) -> f32 {
        let bonus = if self.has_personal_reference {
            self.calibration_bonus
        } else {
            0.0
        };
        (self.base_threshold - bonus + self.user_tune_offset).clamp(0.0, 1.0)
    }

    /// Number of passing samples required by the pass-count rule
    ///
    /// `ceil(buffer_capacity * acceptance_fraction)`. Note this is relative to
    /// capacity, not to the current fill level, so a partly filled buffer
    /// needs the same absolute number of passes.
    ///
    /// The product is taken in f64 and shaved by one f32 epsilon (relative)
    /// before rounding up, so a fraction like 0.6 stored as 0.60000002 does
    /// not demand an extra pass.
    pub fn required_passes(&self) -> usize {
        let product = self.buffer_capacity as f64 * f64::from(self.acceptance_fraction);
        let slack = product * f64::from(f32::EPSILON);
        (product - slack).ceil().max(0.0) as usize
    }

    /// Validate every field
    ///
    /// # Errors
    /// `GradingError::InvalidConfig` naming the first offending field
    pub fn validate(&self) -> Result<(), GradingError> {
        check_finite("base_threshold", self.base_threshold)?;
        if self.base_threshold <= 0.0 || self.base_threshold >= 1.0 {
            return Err(GradingError::invalid(
                "base_threshold",
                format!("must be within (0, 1) (got {})", self.base_threshold),
            ));
        }

        check_unit("calibration_bonus", self.calibration_bonus)?;

        check_finite("user_tune_offset", self.user_tune_offset)?;
        if !(-1.0..=1.0).contains(&self.user_tune_offset) {
            return Err(GradingError::invalid(
                "user_tune_offset",
                format!("must be within [-1, 1] (got {})", self.user_tune_offset),
            ));
        }

        if self.buffer_capacity < 1 {
            return Err(GradingError::invalid(
                "buffer_capacity",
                format!("must be at least 1 (got {})", self.buffer_capacity),
            ));
        }

        check_unit("acceptance_fraction", self.acceptance_fraction)?;
        check_unit("median_slack", self.median_slack)?;

        let bands = &self.tier_bands;
        check_unit("tier_bands.perfect", bands.perfect)?;
        check_unit("tier_bands.good", bands.good)?;
        check_unit("tier_bands.almost", bands.almost)?;
        if bands.perfect < bands.good || bands.good < bands.almost {
            return Err(GradingError::invalid(
                "tier_bands",
                format!(
                    "must satisfy perfect >= good >= almost (got {} / {} / {})",
                    bands.perfect, bands.good, bands.almost
                ),
            ));
        }

        Ok(())
    }

    /// Copy with a new user leniency offset, validated
    pub fn with_user_tune(&self, offset: f32) -> Result<Self, GradingError> {
        let next = Self {
            user_tune_offset: offset,
            ..self.clone()
        };
        next.validate()?;
        Ok(next)
    }

    /// Copy with the personal-reference flag toggled, validated
    pub fn with_personal_reference(&self, present: bool) -> Result<Self, GradingError> {
        let next = Self {
            has_personal_reference: present,
            ..self.clone()
        };
        next.validate()?;
        Ok(next)
    }
}

fn check_finite(field: &str, value: f32) -> Result<(), GradingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GradingError::invalid(
            field,
            format!("must be finite (got {})", value),
        ))
    }
}

fn check_unit(field: &str, value: f32) -> Result<(), GradingError> {
    check_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GradingError::invalid(
            field,
            format!("must be within [0, 1] (got {})", value),
        ))
    }
}
