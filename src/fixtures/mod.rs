//! Fixture utilities for the deterministic CLI harness.
//!
//! This module discovers recorded similarity sequences on disk, parses
//! optional expectation JSON, and replays the samples through a fresh
//! `PracticeSession`. It also builds seeded synthetic sequences so grading
//! parameters can be explored without a classifier.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::grading::{GradeResult, GradingConfig, Tier};
use crate::session::{PracticeSession, PracticeStatus};
use crate::telemetry::{self, DiagnosticError};

/// Default location for fixture JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Recorded similarity sequence for one target label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSequence {
    pub label: String,
    /// `null` entries are no-hand frames
    pub samples: Vec<Option<f32>>,
    /// Grading override for this fixture
    #[serde(default)]
    pub grading: Option<GradingConfig>,
}

/// Loaded fixture data.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub sequence: SampleSequence,
    pub expectations: Option<FixtureExpectations>,
}

/// One replayed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStep {
    pub index: usize,
    pub input: Option<f32>,
    pub status: PracticeStatus,
    pub result: GradeResult,
}

/// JSON expectation schema for fixture verification.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub steps: Vec<ExpectedStep>,
}

/// Expected outcome for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedStep {
    pub tier: Tier,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PracticeStatus>,
}

impl ExpectedStep {
    fn matches(&self, step: &ReplayStep) -> bool {
        self.tier == step.result.tier
            && self.accepted == step.result.accepted
            && self.status.map_or(true, |s| s == step.status)
    }
}

impl FixtureExpectations {
    pub fn verify(&self, actual: &[ReplayStep]) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        for (idx, expected) in self.steps.iter().enumerate() {
            match actual.get(idx) {
                Some(step) if expected.matches(step) => {}
                Some(step) => failures.push(ExpectationFailure {
                    index: idx,
                    expected: Some(expected.clone()),
                    actual: Some(step.clone()),
                }),
                None => failures.push(ExpectationFailure {
                    index: idx,
                    expected: Some(expected.clone()),
                    actual: None,
                }),
            }
        }

        for (idx, step) in actual.iter().enumerate().skip(self.steps.len()) {
            failures.push(ExpectationFailure {
                index: idx,
                expected: None,
                actual: Some(step.clone()),
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "index": failure.index,
                    "expected": failure.expected,
                    "actual": failure.actual.as_ref().map(|step| serde_json::json!({
                        "tier": step.result.tier,
                        "accepted": step.result.accepted,
                        "status": step.status,
                    })),
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub index: usize,
    pub expected: Option<ExpectedStep>,
    pub actual: Option<ReplayStep>,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if file_name.ends_with(".expect.json") || !file_name.ends_with(".json") {
                continue;
            }
            fixtures.push(self.metadata_for_path(&path)?);
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load a fixture plus expectations by name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        self.load_inner(fixture, override_expect).inspect_err(|err| {
            telemetry::hub().record_error(DiagnosticError::FixtureLoad, format!("{:#}", err));
        })
    }

    fn load_inner(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&path)?;

        let contents =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let sequence: SampleSequence = serde_json::from_str(&contents)
            .with_context(|| format!("parsing fixture {}", path.display()))?;

        let expect_path = override_expect.or_else(|| metadata.expect_path.clone());
        let expectations = match expect_path {
            Some(expect) => Some(load_expectations(&expect)?),
            None => None,
        };

        Ok(FixtureData {
            metadata,
            sequence,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let direct = PathBuf::from(fixture);
        if direct.is_file() {
            return Ok(direct);
        }
        let named = self.root.join(format!("{}.json", fixture));
        if named.is_file() {
            return Ok(named);
        }
        Err(anyhow!(
            "fixture '{}' not found under {}",
            fixture,
            self.root.display()
        ))
    }

    fn metadata_for_path(&self, path: &Path) -> Result<FixtureMetadata> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("invalid fixture file name {}", path.display()))?
            .to_string();
        let expect = path.with_file_name(format!("{}.expect.json", name));
        Ok(FixtureMetadata {
            name,
            path: path.to_path_buf(),
            expect_path: expect.exists().then_some(expect),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

fn load_expectations(path: &Path) -> Result<FixtureExpectations> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Replays sample sequences through a practice session.
pub struct FixtureProcessor {
    config: AppConfig,
}

impl FixtureProcessor {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Replay every sample of `sequence` in order against its label.
    ///
    /// The fixture's own grading block, when present, replaces the
    /// configured grading parameters. The label does not have to be part
    /// of the configured sequence.
    pub fn run(&self, sequence: &SampleSequence) -> Result<Vec<ReplayStep>> {
        let grading = sequence
            .grading
            .clone()
            .unwrap_or_else(|| self.config.grading.clone());
        let mut session =
            PracticeSession::new(grading, self.config.practice.labels.clone(), false)
                .context("building practice session")?;
        session
            .set_target(&sequence.label)
            .with_context(|| format!("targeting label '{}'", sequence.label))?;

        let steps = sequence
            .samples
            .iter()
            .enumerate()
            .map(|(index, &input)| {
                let result = session.submit(input);
                ReplayStep {
                    index,
                    input,
                    status: session.status(),
                    result,
                }
            })
            .collect();
        Ok(steps)
    }
}

/// Parameters for a synthetic similarity stream.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticProfile {
    /// Centre of the similarity distribution
    pub mean: f32,
    /// Uniform noise half-width around `mean`
    pub jitter: f32,
    /// Probability of a no-hand frame
    pub drop_rate: f64,
    pub frames: usize,
    pub seed: u64,
}

/// Generate a reproducible noisy similarity sequence.
///
/// Values are left unclamped so out-of-range classifier noise can be
/// exercised; the grader clamps them.
pub fn synthetic_samples(profile: &SyntheticProfile) -> Vec<Option<f32>> {
    let mut rng = StdRng::seed_from_u64(profile.seed);
    let jitter = profile.jitter.abs();
    let drop_rate = if profile.drop_rate.is_nan() {
        0.0
    } else {
        profile.drop_rate.clamp(0.0, 1.0)
    };

    (0..profile.frames)
        .map(|_| {
            if rng.gen_bool(drop_rate) {
                None
            } else if jitter == 0.0 || !jitter.is_finite() {
                Some(profile.mean)
            } else {
                Some(profile.mean + rng.gen_range(-jitter..=jitter))
            }
        })
        .collect()
}
