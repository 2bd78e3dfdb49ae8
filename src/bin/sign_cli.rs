use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sign_trainer::config::AppConfig;
use sign_trainer::fixtures::{
    synthetic_samples, ExpectationDiff, FixtureCatalog, FixtureProcessor, ReplayStep,
    SampleSequence, SyntheticProfile,
};

#[derive(Parser, Debug)]
#[command(
    name = "sign_cli",
    about = "Deterministic grading harness for Sign Trainer"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    /// JSON configuration file (defaults are used when absent)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded similarity fixture and optionally compare against expectations
    Replay {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Grade a seeded synthetic similarity stream
    Simulate {
        #[arg(long, default_value = "A")]
        label: String,
        #[arg(long, default_value_t = 0.8)]
        mean: f32,
        #[arg(long, default_value_t = 0.05)]
        jitter: f32,
        #[arg(long, default_value_t = 0.0)]
        drop_rate: f64,
        #[arg(long, default_value_t = 16)]
        frames: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Print the configured practice label sequence
    Labels,
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    sign_trainer::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match cli.config.as_ref() {
        Some(path) => AppConfig::try_load_from_file(path)?,
        None => AppConfig::default(),
    };
    config
        .grading
        .validate()
        .context("validating grading configuration")?;
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_default();

    match cli.command {
        Commands::Replay {
            fixture,
            expect,
            output,
        } => run_replay(&catalog, config, &fixture, expect, output),
        Commands::Simulate {
            label,
            mean,
            jitter,
            drop_rate,
            frames,
            seed,
        } => {
            let profile = SyntheticProfile {
                mean,
                jitter,
                drop_rate,
                frames,
                seed,
            };
            run_simulate(config, label, &profile)
        }
        Commands::Labels => run_labels(&config),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn run_replay(
    catalog: &FixtureCatalog,
    config: AppConfig,
    fixture: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let processor = FixtureProcessor::new(config);
    let data = catalog.load(fixture, override_expect)?;
    let steps = processor
        .run(&data.sequence)
        .with_context(|| format!("replaying fixture {}", fixture))?;

    emit_report(&data.metadata.name, &data.sequence.label, &steps, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&steps) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_simulate(config: AppConfig, label: String, profile: &SyntheticProfile) -> Result<ExitCode> {
    let sequence = SampleSequence {
        label,
        samples: synthetic_samples(profile),
        grading: None,
    };
    let processor = FixtureProcessor::new(config);
    let steps = processor
        .run(&sequence)
        .context("grading synthetic stream")?;

    let source = format!("synthetic:seed={}", profile.seed);
    emit_report(&source, &sequence.label, &steps, None)?;
    Ok(ExitCode::from(0))
}

fn run_labels(config: &AppConfig) -> Result<ExitCode> {
    for label in config.practice.labels.iter() {
        println!("{label}");
    }
    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(
    source: &str,
    label: &str,
    steps: &[ReplayStep],
    output_path: Option<PathBuf>,
) -> Result<()> {
    let report = ReplayReportPayload {
        source,
        label,
        step_count: steps.len(),
        first_accepted: steps
            .iter()
            .find(|step| step.result.accepted)
            .map(|step| step.index),
        steps,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct ReplayReportPayload<'a> {
    source: &'a str,
    label: &'a str,
    step_count: usize,
    first_accepted: Option<usize>,
    #[serde(skip_serializing_if = "slice_empty")]
    steps: &'a [ReplayStep],
}

fn slice_empty(steps: &&[ReplayStep]) -> bool {
    steps.is_empty()
}
