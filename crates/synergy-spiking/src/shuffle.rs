// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Surrogate datasets for significance testing
//!
//! Permuting the postsynaptic counts within a cell keeps every marginal
//! distribution but breaks the trial-by-trial coupling between sources and
//! target, which is what the decomposition measures.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::dataset::SpikingDataset;
use crate::types::Regime;

/// Copy of `dataset` with the regime's postsynaptic column shuffled per cell
///
/// Deterministic for a given `seed`. The other regime is left untouched.
pub fn shuffle_data(dataset: &SpikingDataset, regime: Regime, seed: u64) -> SpikingDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut shuffled = dataset.clone();
    let cells = dataset.cells();

    let records = shuffled.records_mut();
    for (_, rows) in &cells {
        let mut targets: Vec<f64> = rows
            .iter()
            .map(|&row| records[row].counts(regime).postsynaptic)
            .collect();
        targets.shuffle(&mut rng);
        for (&row, value) in rows.iter().zip(targets) {
            records[row].counts_mut(regime).postsynaptic = value;
        }
    }

    debug!(
        target: "synergy-spiking",
        "Shuffled {} postsynaptic counts across {} cells (seed {})",
        regime,
        cells.len(),
        seed
    );
    shuffled
}
