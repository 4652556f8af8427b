// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `synergy_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plasticity schemes analysed when none are configured
pub const DEFAULT_SCHEMES: [&str; 3] = ["Hebbian", "Hebbian_antiHebbian", "Hebbian_scaling"];

/// Timing regimes analysed when none are configured
pub const DEFAULT_REGIMES: [&str; 2] = ["phasic", "tonic"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SynergyConfig {
    pub paths: PathsConfig,
    pub binning: BinningConfig,
    pub surrogates: SurrogateConfig,
    pub analysis: AnalysisConfig,
    pub significance: SignificanceConfig,
    pub logging: LoggingConfig,
}

/// Input and output directory layout
///
/// Every sub-directory is resolved against `data_dir`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub spiking_dir: PathBuf,
    pub results_dir: PathBuf,
    pub surrogates_dir: PathBuf,
    pub figures_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("files"),
            spiking_dir: PathBuf::from("spiking_data"),
            results_dir: PathBuf::from("results"),
            surrogates_dir: PathBuf::from("surrogates"),
            figures_dir: PathBuf::from("figures"),
        }
    }
}

impl PathsConfig {
    /// Directory holding one sub-directory of `.dat` files per plasticity scheme
    pub fn spiking_path(&self) -> PathBuf {
        self.data_dir.join(&self.spiking_dir)
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_dir)
    }

    pub fn surrogates_path(&self) -> PathBuf {
        self.data_dir.join(&self.surrogates_dir)
    }

    pub fn figures_path(&self) -> PathBuf {
        self.data_dir.join(&self.figures_dir)
    }
}

/// Discretisation applied before estimating information terms
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Equal-width bins per dimension
    pub n_bins: usize,
    /// Number of shifted binnings averaged together
    pub n_shifts: usize,
    /// Decimal places PID terms are rounded to
    pub decimals: u32,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            n_bins: 10,
            n_shifts: 3,
            decimals: 4,
        }
    }
}

/// Surrogate (shuffled) dataset generation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SurrogateConfig {
    /// Shuffled datasets generated per scheme and regime
    pub n_surrogates: usize,
    /// Seed of the first (regime, scheme) pair; later pairs follow in grid order
    pub base_seed: u64,
}

impl Default for SurrogateConfig {
    fn default() -> Self {
        Self {
            n_surrogates: 10,
            base_seed: 0,
        }
    }
}

/// Which parts of the parameter grid are analysed
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub schemes: Vec<String>,
    pub regimes: Vec<String>,
    /// "pathway" (pathway-specific spike counts) or "all" (population totals)
    pub source_scope: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schemes: DEFAULT_SCHEMES.iter().map(|s| s.to_string()).collect(),
            regimes: DEFAULT_REGIMES.iter().map(|s| s.to_string()).collect(),
            source_scope: "pathway".to_string(),
        }
    }
}

/// Surrogate comparison settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignificanceConfig {
    /// Threshold used to flag significant terms in figures
    pub alpha: f64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}
