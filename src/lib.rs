// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synergy-pid
//!
//! How much of a postsynaptic neuron's spike-count information is carried
//! uniquely, redundantly or synergistically by an excitatory and two
//! inhibitory presynaptic populations, across plasticity schemes, firing
//! regimes and learning time.
//!
//! ## Crates
//!
//! - [`config`]: `synergy_configuration.toml` loading with env and CLI overrides
//! - [`observability`]: tracing setup and per-crate debug flags
//! - [`infotheory`]: shifted-histogram binning, entropy, Williams–Beer PID
//! - [`stats`]: mean, sample std, Mann–Whitney U
//! - [`spiking`]: `.dat` records, trial grouping, surrogate shuffling
//! - [`analysis`]: PID tables, significance, figure specifications, batch stages
//!
//! ## Batch run
//!
//! ```rust,no_run
//! use synergy_pid::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(None, None)?;
//! let ctx = AnalysisContext::from_config(&config)?;
//! run_all(&ctx)?;
//! # Ok(())
//! # }
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use synergy_analysis as analysis;
pub use synergy_config as config;
pub use synergy_infotheory as infotheory;
pub use synergy_observability as observability;
pub use synergy_spiking as spiking;
pub use synergy_stats as stats;

/// Common imports for driving the pipeline
pub mod prelude {
    pub use synergy_analysis::{
        aggregate, generate_p_values, generate_pid_results, pid_analysis, plot_pid, run_all,
        run_figures, run_generate, run_significance, run_surrogates, AnalysisContext,
        AnalysisError, GenerateMode, GenerateOutcome, PidRow, PidSettings, PidSummary, PidTerm,
        PidTerms, PValueRow,
    };
    pub use synergy_config::{load_config, load_config_or_default, validate_config, SynergyConfig};
    pub use synergy_spiking::{
        combine_data, shuffle_data, spiking_files, PlasticityScheme, Regime, SourceScope,
        SpikingDataset,
    };
}
