// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Batch stages over the configured schemes and regimes
//!
//! Stages run in the order `generate`, `surrogates`, `significance`,
//! `figures`. Each loops regimes in the outer loop and schemes in the inner
//! one.

use std::path::PathBuf;

use synergy_spiking::{PlasticityScheme, Regime};
use tracing::{info, warn};

use crate::aggregate::PidSummary;
use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use crate::figures::{figure_conditions, plot_pid};
use crate::pipeline::{generate_pid_results, GenerateMode, GenerateOutcome};
use crate::significance::{save_p_values, PValueRow};
use crate::storage::{figure_dir, final_results_file, p_values_file, read_json};

/// Per-trial and final results for every scheme and regime
pub fn run_generate(ctx: &AnalysisContext) -> AnalysisResult<Vec<GenerateOutcome>> {
    let mut outcomes = Vec::new();
    for &regime in &ctx.regimes {
        for &scheme in &ctx.schemes {
            outcomes.push(generate_pid_results(ctx, scheme, regime, GenerateMode::Results)?);
        }
    }
    Ok(outcomes)
}

/// Surrogate seed of a (scheme, regime) pair
///
/// The counter starts at `base_seed` and advances once per pair of the full
/// grid, regimes outer and schemes inner. A pair keeps its seed when the run
/// is restricted to a subset of schemes or regimes.
pub fn surrogate_seed(base_seed: u64, scheme: PlasticityScheme, regime: Regime) -> AnalysisResult<u64> {
    let scheme_pos = PlasticityScheme::ALL.iter().position(|&s| s == scheme).unwrap_or_default();
    let regime_pos = Regime::ALL.iter().position(|&r| r == regime).unwrap_or_default();
    let offset = (regime_pos * PlasticityScheme::ALL.len() + scheme_pos) as u64;
    base_seed.checked_add(offset).ok_or_else(|| {
        AnalysisError::Config(format!(
            "base_seed {} leaves no surrogate seed for {} {}",
            base_seed, scheme, regime
        ))
    })
}

/// Surrogate tables for every scheme and regime
pub fn run_surrogates(ctx: &AnalysisContext) -> AnalysisResult<Vec<GenerateOutcome>> {
    let mut outcomes = Vec::new();
    for &regime in &ctx.regimes {
        for &scheme in &ctx.schemes {
            let mode = GenerateMode::Surrogate {
                seed: surrogate_seed(ctx.base_seed, scheme, regime)?,
                n_surrogates: ctx.n_surrogates,
            };
            outcomes.push(generate_pid_results(ctx, scheme, regime, mode)?);
        }
    }
    Ok(outcomes)
}

/// p-value tables for every scheme and regime
pub fn run_significance(ctx: &AnalysisContext) -> AnalysisResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for &regime in &ctx.regimes {
        for &scheme in &ctx.schemes {
            written.push(save_p_values(ctx, scheme, regime)?);
        }
    }
    Ok(written)
}

/// One figure per (k_condition, pathway) of every final results table
pub fn run_figures(ctx: &AnalysisContext) -> AnalysisResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for &regime in &ctx.regimes {
        for &scheme in &ctx.schemes {
            let summary: Vec<PidSummary> =
                read_json(&final_results_file(&ctx.results_dir, scheme, regime))?;

            let p_path = p_values_file(&ctx.results_dir, scheme, regime);
            let p_values: Option<Vec<PValueRow>> = if p_path.is_file() {
                Some(read_json(&p_path)?)
            } else {
                warn!(
                    target: "synergy-analysis",
                    "No p-values for {} {}, figures will not mark significance",
                    scheme,
                    regime
                );
                None
            };

            let dir = figure_dir(&ctx.figures_dir, scheme, regime);
            for (k_condition, pathway) in figure_conditions(&summary) {
                let figure = plot_pid(&summary, k_condition, pathway, p_values.as_deref(), ctx.alpha)?;
                written.push(figure.write(&dir)?);
            }
            info!(
                target: "synergy-analysis",
                "Figures for {} {} written to {}",
                scheme,
                regime,
                dir.display()
            );
        }
    }
    Ok(written)
}

/// Every stage in order
pub fn run_all(ctx: &AnalysisContext) -> AnalysisResult<()> {
    let generated = run_generate(ctx)?;
    let surrogates = run_surrogates(ctx)?;
    let skipped = generated
        .iter()
        .chain(&surrogates)
        .filter(|o| matches!(o, GenerateOutcome::Skipped(_)))
        .count();
    let p_tables = run_significance(ctx)?;
    let figures = run_figures(ctx)?;
    info!(
        target: "synergy-analysis",
        "Pipeline complete: {} tables ({} cached), {} p-value tables, {} figures",
        generated.len() + surrogates.len(),
        skipped,
        p_tables.len(),
        figures.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrogate_seed_follows_full_grid() {
        assert_eq!(surrogate_seed(0, PlasticityScheme::Hebbian, Regime::Phasic).unwrap(), 0);
        assert_eq!(surrogate_seed(0, PlasticityScheme::HebbianScaling, Regime::Phasic).unwrap(), 2);
        assert_eq!(surrogate_seed(0, PlasticityScheme::Hebbian, Regime::Tonic).unwrap(), 3);
        assert_eq!(surrogate_seed(10, PlasticityScheme::HebbianAntiHebbian, Regime::Tonic).unwrap(), 14);
    }

    #[test]
    fn test_surrogate_seed_overflow_is_an_error() {
        assert!(surrogate_seed(u64::MAX, PlasticityScheme::Hebbian, Regime::Phasic).is_ok());
        assert!(matches!(
            surrogate_seed(u64::MAX, PlasticityScheme::Hebbian, Regime::Tonic),
            Err(AnalysisError::Config(_))
        ));
    }
}
