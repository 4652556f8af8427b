// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! PID tables for real and shuffled data, cached on disk

use std::ops::Range;
use std::path::PathBuf;

use synergy_spiking::{combine_data, shuffle_data, spiking_files, PlasticityScheme, Regime};
use tracing::info;

use crate::aggregate::aggregate;
use crate::context::AnalysisContext;
use crate::decomposition::pid_analysis;
use crate::error::{AnalysisError, AnalysisResult};
use crate::storage::{final_results_file, surrogate_file, trials_results_file, write_json};
use crate::terms::SurrogatePidRow;

/// What [`generate_pid_results`] computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    /// Per-trial and aggregated tables of the recorded data
    Results,
    /// `n_surrogates` shuffled datasets; dataset `i` uses seed `seed * n_surrogates + i`
    Surrogate { seed: u64, n_surrogates: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Written(PathBuf),
    /// Output already existed; nothing was recomputed
    Skipped(PathBuf),
}

impl GenerateOutcome {
    pub fn path(&self) -> &PathBuf {
        match self {
            GenerateOutcome::Written(path) | GenerateOutcome::Skipped(path) => path,
        }
    }
}

/// Random seeds of the datasets generated for surrogate `seed`
pub fn surrogate_seed_range(seed: u64, n_surrogates: usize) -> AnalysisResult<Range<u64>> {
    let overflow = || {
        AnalysisError::Config(format!(
            "surrogate seed {} with {} datasets overflows the u64 seed range",
            seed, n_surrogates
        ))
    };
    let n = n_surrogates as u64;
    let first = seed.checked_mul(n).ok_or_else(overflow)?;
    let end = first.checked_add(n).ok_or_else(overflow)?;
    Ok(first..end)
}

/// Compute and store the PID tables of one scheme and regime
///
/// Output files are written once. If every output of `mode` already exists
/// the call returns [`GenerateOutcome::Skipped`] without reading any input.
/// The per-trial table is written last, so a run interrupted before it is
/// redone in full.
pub fn generate_pid_results(
    ctx: &AnalysisContext,
    scheme: PlasticityScheme,
    regime: Regime,
    mode: GenerateMode,
) -> AnalysisResult<GenerateOutcome> {
    let (target, complete) = match mode {
        GenerateMode::Results => {
            let trials = trials_results_file(&ctx.results_dir, scheme, regime);
            let complete = trials.is_file() && final_results_file(&ctx.results_dir, scheme, regime).is_file();
            (trials, complete)
        }
        GenerateMode::Surrogate { seed, n_surrogates } => {
            surrogate_seed_range(seed, n_surrogates)?;
            let file = surrogate_file(&ctx.surrogates_dir, scheme, regime, seed);
            let complete = file.is_file();
            (file, complete)
        }
    };
    if complete {
        info!(
            target: "synergy-analysis",
            "{} already exists for {} {}, skipping",
            target.display(),
            regime,
            scheme
        );
        return Ok(GenerateOutcome::Skipped(target));
    }

    info!(target: "synergy-analysis", "Processing data ({})", scheme);
    let files = spiking_files(&ctx.spiking_dir, scheme)?;
    let spiking = combine_data(&files)?;

    match mode {
        GenerateMode::Results => {
            info!(target: "synergy-analysis", "Generating PIDs ({} {})", scheme, regime);
            let rows = pid_analysis(&spiking, regime, &ctx.settings)?;

            let summary = aggregate(&rows);
            let final_path = final_results_file(&ctx.results_dir, scheme, regime);
            write_json(&final_path, &summary)?;
            write_json(&target, &rows)?;
            info!(
                target: "synergy-analysis",
                "Saved {} trial rows and {} condition summaries ({} {})",
                rows.len(),
                summary.len(),
                scheme,
                regime
            );
        }
        GenerateMode::Surrogate { seed, n_surrogates } => {
            let mut all_rows = Vec::new();
            for random_seed in surrogate_seed_range(seed, n_surrogates)? {
                info!(
                    target: "synergy-analysis",
                    "Surrogate dataset {} ({} {})",
                    random_seed,
                    scheme,
                    regime
                );
                let shuffled = shuffle_data(&spiking, regime, random_seed);
                let rows = pid_analysis(&shuffled, regime, &ctx.settings)?;
                all_rows.extend(rows.into_iter().map(|row| SurrogatePidRow { row, random_seed }));
            }
            write_json(&target, &all_rows)?;
            info!(
                target: "synergy-analysis",
                "Saved {} surrogate rows to {}",
                all_rows.len(),
                target.display()
            );
        }
    }

    Ok(GenerateOutcome::Written(target))
}
