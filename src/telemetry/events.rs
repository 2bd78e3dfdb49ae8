//! Core telemetry event types describing practice diagnostics exposed to
//! CLI surfaces and broadcast subscribers.

use serde::{Deserialize, Serialize};

use crate::grading::Tier;

/// Diagnostic error codes surfaced via telemetry metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticError {
    ScorerUnavailable,
    InvalidLabel,
    FixtureLoad,
    Unknown,
}

/// Metric events covering grades, acceptance rate, and target changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    Grade {
        label: String,
        tier: Tier,
        similarity: Option<f32>,
        accepted: bool,
    },
    AcceptanceRate {
        rate: f32,
        window: usize,
    },
    Advance {
        from: String,
        to: String,
    },
    Error {
        code: DiagnosticError,
        context: String,
    },
}
