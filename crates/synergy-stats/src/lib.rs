// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synergy-stats
//!
//! Small statistics toolkit used to summarise PID tables and compare them
//! against surrogate baselines:
//! - `summary` - mean, sample standard deviation, distinct-value checks
//! - `mann_whitney` - Mann–Whitney U rank-sum test (exact and asymptotic)
//! - `normal` - standard normal tail probabilities

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod mann_whitney;
pub mod normal;
pub mod summary;

pub use mann_whitney::{mann_whitney_u, Alternative, MannWhitneyResult, Method};
pub use normal::{erfc, normal_sf};
pub use summary::{has_single_value, mean, sample_std};

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors raised by statistical routines
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("Sample '{0}' is empty")]
    EmptySample(&'static str),

    #[error("Sample '{sample}' contains a non-finite value at index {index}")]
    NonFiniteValue { sample: &'static str, index: usize },
}
