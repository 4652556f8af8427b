// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synergy-spiking
//!
//! Spike-count output of the plasticity simulations.
//!
//! ```text
//! files/spiking_data/<scheme>/*.dat ──► read_data / combine_data ──► SpikingDataset
//!                                                   │
//!                                 cells() / filter() / column()
//!                                                   │
//!                                  shuffle_data(regime, seed) ──► surrogate
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod dataset;
pub mod error;
pub mod reader;
pub mod shuffle;
pub mod types;

pub use dataset::{column, CellIndex, SpikingDataset};
pub use error::{SpikingError, SpikingResult};
pub use reader::{combine_data, read_data, spiking_files, trials_group_id};
pub use shuffle::shuffle_data;
pub use types::{
    CellKey, PlasticityScheme, Population, Regime, RegimeCounts, SourceScope, SpikeRecord,
    SPIKING_COLUMNS,
};
