// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resolved run parameters
//!
//! [`AnalysisContext`] turns the string-typed configuration into the typed
//! schemes, regimes and directories the pipeline works with.

use std::path::PathBuf;

use synergy_config::SynergyConfig;
use synergy_spiking::{PlasticityScheme, Regime, SourceScope};

use crate::decomposition::PidSettings;
use crate::error::{AnalysisError, AnalysisResult};

#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub spiking_dir: PathBuf,
    pub results_dir: PathBuf,
    pub surrogates_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub schemes: Vec<PlasticityScheme>,
    /// Outer loop of every batch run
    pub regimes: Vec<Regime>,
    pub settings: PidSettings,
    pub n_surrogates: usize,
    pub base_seed: u64,
    pub alpha: f64,
}

impl AnalysisContext {
    pub fn from_config(config: &SynergyConfig) -> AnalysisResult<Self> {
        let schemes = config
            .analysis
            .schemes
            .iter()
            .map(|name| name.parse::<PlasticityScheme>())
            .collect::<Result<Vec<_>, _>>()?;
        let regimes = config
            .analysis
            .regimes
            .iter()
            .map(|name| name.parse::<Regime>())
            .collect::<Result<Vec<_>, _>>()?;
        let scope: SourceScope = config.analysis.source_scope.parse()?;

        if config.surrogates.n_surrogates == 0 {
            return Err(AnalysisError::Config(
                "n_surrogates must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            spiking_dir: config.paths.spiking_path(),
            results_dir: config.paths.results_path(),
            surrogates_dir: config.paths.surrogates_path(),
            figures_dir: config.paths.figures_path(),
            schemes,
            regimes,
            settings: PidSettings::from_binning(&config.binning, scope),
            n_surrogates: config.surrogates.n_surrogates,
            base_seed: config.surrogates.base_seed,
            alpha: config.significance.alpha,
        })
    }
}
