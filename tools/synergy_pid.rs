// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! synergy-pid batch runner
//!
//! Stages, in the order they depend on each other:
//! 1. `generate`     - PID tables of the recorded spiking data
//! 2. `surrogates`   - PID tables of shuffled datasets
//! 3. `significance` - Mann–Whitney p-values, real vs surrogate
//! 4. `figures`      - figure specifications per condition and pathway
//!
//! `all` runs the four in sequence. Finished tables are never recomputed.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::info;

use synergy_analysis::{
    run_all, run_figures, run_generate, run_significance, run_surrogates, AnalysisContext,
    GenerateOutcome,
};
use synergy_config::{load_config_or_default, validate_config};
use synergy_observability::{debug_flags_help, init_logging, CrateDebugFlags, LogFileSettings};

/// Partial information decomposition of spiking data with surrogate significance testing
#[derive(Parser, Debug)]
#[command(name = "synergy-pid", version, author, long_about = None)]
struct Cli {
    /// Path to synergy_configuration.toml (searched for when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root of the data tree (spiking_data/, results/, surrogates/, figures/)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Plasticity schemes to process (comma-separated)
    #[arg(long, global = true)]
    scheme: Option<String>,

    /// Firing regimes to process (comma-separated: phasic,tonic)
    #[arg(long, global = true)]
    regime: Option<String>,

    /// Shuffled datasets per scheme and regime
    #[arg(long, global = true)]
    n_surrogates: Option<usize>,

    /// Surrogate seed of the first (regime, scheme) pair of the full grid
    #[arg(long, global = true)]
    base_seed: Option<u64>,

    /// Source counts used for the decomposition: pathway or all
    #[arg(long, global = true)]
    source_scope: Option<String>,

    /// Write JSON log files under this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Stage,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Stage {
    /// PID tables of the recorded data
    Generate,
    /// PID tables of shuffled surrogate datasets
    Surrogates,
    /// Real vs surrogate p-values
    Significance,
    /// Figure specifications from the final results
    Figures,
    /// Every stage in order
    All,
}

impl Cli {
    /// Options that override configuration values
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(dir) = &self.data_dir {
            overrides.insert("data_dir".to_string(), dir.display().to_string());
        }
        if let Some(schemes) = &self.scheme {
            overrides.insert("schemes".to_string(), schemes.clone());
        }
        if let Some(regimes) = &self.regime {
            overrides.insert("regimes".to_string(), regimes.clone());
        }
        if let Some(n) = self.n_surrogates {
            overrides.insert("n_surrogates".to_string(), n.to_string());
        }
        if let Some(seed) = self.base_seed {
            overrides.insert("base_seed".to_string(), seed.to_string());
        }
        if let Some(scope) = &self.source_scope {
            overrides.insert("source_scope".to_string(), scope.clone());
        }
        if let Some(dir) = &self.log_dir {
            overrides.insert("log_dir".to_string(), dir.display().to_string());
        }
        overrides
    }
}

fn log_outcomes(stage: &str, outcomes: &[GenerateOutcome]) {
    for outcome in outcomes {
        match outcome {
            GenerateOutcome::Written(path) => {
                info!(target: "synergy-pid", "[{}] wrote {}", stage, path.display())
            }
            GenerateOutcome::Skipped(path) => {
                info!(target: "synergy-pid", "[{}] cached {}", stage, path.display())
            }
        }
    }
}

fn main() -> Result<()> {
    // `--debug-<crate>` flags are not clap options; split them off first
    let (debug_args, args): (Vec<String>, Vec<String>) =
        env::args().partition(|arg| arg.starts_with("--debug-"));
    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(list) = env::var("SYNERGY_DEBUG") {
        debug_flags.merge_list(&list);
    }

    let matches = Cli::command()
        .after_help(debug_flags_help())
        .get_matches_from(args);
    let cli = Cli::from_arg_matches(&matches)?;

    let config = load_config_or_default(cli.config.as_deref(), Some(&cli.overrides()))
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let log_files = config.logging.file_logging.then(|| LogFileSettings {
        log_dir: config.logging.log_dir.clone(),
        retention_days: config.logging.retention_days,
        retention_runs: config.logging.retention_runs,
    });
    let _log_guard = init_logging(&debug_flags, &config.logging.level, log_files.as_ref())?;

    let ctx = AnalysisContext::from_config(&config)?;
    info!(
        target: "synergy-pid",
        "synergy-pid {} | data: {} | schemes: {:?} | regimes: {:?}",
        synergy_pid::VERSION,
        config.paths.data_dir.display(),
        ctx.schemes,
        ctx.regimes
    );

    match cli.command {
        Stage::Generate => log_outcomes("generate", &run_generate(&ctx)?),
        Stage::Surrogates => log_outcomes("surrogates", &run_surrogates(&ctx)?),
        Stage::Significance => {
            for path in run_significance(&ctx)? {
                info!(target: "synergy-pid", "[significance] wrote {}", path.display());
            }
        }
        Stage::Figures => {
            let figures = run_figures(&ctx)?;
            info!(target: "synergy-pid", "[figures] wrote {} figure specifications", figures.len());
        }
        Stage::All => run_all(&ctx)?,
    }

    Ok(())
}
