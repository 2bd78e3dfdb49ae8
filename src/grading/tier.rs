// Tier - qualitative bucket for a single similarity sample

use serde::{Deserialize, Serialize};

use crate::grading::config::TierBands;

/// Quality tier of one sample relative to the effective threshold
///
/// `NoSignal` means the classifier saw nothing usable (no hand in frame);
/// it is not the same as a similarity of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    NoSignal,
    Try,
    Almost,
    Good,
    Perfect,
}

impl Tier {
    /// Classify a clamped similarity against threshold `t`
    pub fn classify(similarity: f32, t: f32, bands: &TierBands) -> Tier {
        if similarity >= t + bands.perfect {
            Tier::Perfect
        } else if similarity >= t + bands.good {
            Tier::Good
        } else if similarity >= t + bands.almost {
            Tier::Almost
        } else {
            Tier::Try
        }
    }

    /// Ordering rank, `NoSignal` lowest
    pub fn rank(&self) -> u8 {
        match self {
            Tier::NoSignal => 0,
            Tier::Try => 1,
            Tier::Almost => 2,
            Tier::Good => 3,
            Tier::Perfect => 4,
        }
    }

    /// Status label shown by the UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::NoSignal => "NO_SIGNAL",
            Tier::Try => "TRY",
            Tier::Almost => "ALMOST",
            Tier::Good => "GOOD",
            Tier::Perfect => "PERFECT",
        }
    }

    /// Coaching line for this tier
    pub fn feedback(&self) -> &'static str {
        match self {
            Tier::NoSignal => "No hand detected. Make sure your hand is in the frame.",
            Tier::Try => "Keep trying! Adjust your hand position and try again.",
            Tier::Almost => "Almost there! You're getting closer to the correct sign.",
            Tier::Good => "Good job! Your sign is looking much better.",
            Tier::Perfect => "Excellent! That's a perfect sign!",
        }
    }
}

impl PartialOrd for Tier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Feedback shown once the buffered samples are accepted
pub const ACCEPTED_FEEDBACK: &str = "Perfect! You've mastered this sign!";
