//! Configuration management for per-deployment and per-user tuning
//!
//! This module provides runtime configuration loading from JSON files, so
//! thresholds, buffer size, tier bands and the practice label set can be
//! adjusted without recompiling. The implicit [`AppConfig::load`] is
//! forgiving (missing or broken files fall back to defaults); an explicitly
//! requested file goes through [`AppConfig::try_load_from_file`], which
//! fails on anything it cannot parse. Validation never forgives, see
//! [`GradingConfig::validate`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::GradingError;
use crate::grading::GradingConfig;
use crate::session::{LabelSequence, PracticeSession};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grading: GradingConfig,
    pub practice: PracticeConfig,
}

/// Practice loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Labels in practice order
    pub labels: LabelSequence,
    /// Reject targets outside `labels`
    pub enforce_sequence: bool,
    /// Delay between scoring calls in milliseconds
    pub poll_interval_ms: u64,
    /// Move on automatically once a sign is accepted
    pub auto_advance: bool,
    /// How long an accepted sign stays on screen before auto-advance
    pub advance_delay_ms: u64,
    /// Number of recent grades used for the acceptance-rate gauge
    pub telemetry_window: usize,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            labels: LabelSequence::alphabet(),
            enforce_sequence: true,
            poll_interval_ms: 250,
            auto_advance: false,
            advance_delay_ms: 1500,
            telemetry_window: 32,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults if the file doesn't exist or the
    /// JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load a configuration the caller asked for explicitly
    ///
    /// # Errors
    /// Unreadable file or JSON that does not deserialize, including
    /// out-of-range types such as a negative `buffer_capacity` or an empty
    /// label list
    pub fn try_load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("[Config] Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from the conventional location
    pub fn load() -> Self {
        Self::load_from_file("assets/grading_config.json")
    }

    /// Validate and build a practice session from this configuration
    pub fn build_session(&self) -> Result<PracticeSession, GradingError> {
        PracticeSession::new(
            self.grading.clone(),
            self.practice.labels.clone(),
            self.practice.enforce_sequence,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.grading.base_threshold, 0.82);
        assert_eq!(config.grading.buffer_capacity, 8);
        assert_eq!(config.practice.labels.len(), 26);
        assert_eq!(config.practice.poll_interval_ms, 250);
        assert!(!config.practice.auto_advance);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.grading, config.grading);
        assert_eq!(parsed.practice.labels, config.practice.labels);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig = serde_json::from_str(
            r#"{ "practice": { "labels": ["HELLO", "THANK_YOU"], "auto_advance": true } }"#,
        )
        .unwrap();
        assert_eq!(parsed.practice.labels.first(), "HELLO");
        assert!(parsed.practice.auto_advance);
        assert_eq!(parsed.practice.advance_delay_ms, 1500);
        assert_eq!(parsed.grading, GradingConfig::default());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/grading_config.json");
        let config = AppConfig::load_from_file(path);
        assert_eq!(config.grading, GradingConfig::default());
        assert_eq!(config.practice.labels, LabelSequence::alphabet());
        assert_eq!(config.practice.telemetry_window, 32);
    }

    #[test]
    fn test_try_load_rejects_malformed_file() {
        let path = std::env::temp_dir().join(format!(
            "sign_trainer_bad_config_{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"grading":{"buffer_capacity":-1,"base_threshold":0.6},"practice":{"labels":[]}}"#,
        )
        .unwrap();

        let result = AppConfig::try_load_from_file(&path);
        fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));
    }

    #[test]
    fn test_try_load_keeps_parsed_values() {
        let path = std::env::temp_dir().join(format!(
            "sign_trainer_good_config_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"grading":{"base_threshold":0.6}}"#).unwrap();

        let result = AppConfig::try_load_from_file(&path);
        fs::remove_file(&path).ok();

        let config = result.unwrap();
        assert_eq!(config.grading.base_threshold, 0.6);
        assert_eq!(config.grading.buffer_capacity, 8);
    }

    #[test]
    fn test_try_load_missing_file_is_an_error() {
        assert!(AppConfig::try_load_from_file("/definitely/not/here/grading.json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/definitely/not/here/grading.json");
        assert_eq!(config.grading, GradingConfig::default());
    }

    #[test]
    fn test_build_session_fails_fast_on_invalid_grading() {
        let mut config = AppConfig::default();
        config.grading.buffer_capacity = 0;
        assert!(matches!(
            config.build_session(),
            Err(GradingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_build_session_uses_first_label() {
        let mut config = AppConfig::default();
        config.practice.labels = LabelSequence::new(["HELLO", "A"]).unwrap();
        let session = config.build_session().unwrap();
        assert_eq!(session.target(), "HELLO");
    }
}
