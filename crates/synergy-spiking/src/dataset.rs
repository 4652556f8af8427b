// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory spiking table and the cell grouping used by the analysis

use ahash::AHashMap;

use crate::types::{CellKey, Population, Regime, SourceScope, SpikeRecord};

/// All records of one plasticity scheme, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpikingDataset {
    records: Vec<SpikeRecord>,
}

/// Row indices of every cell, keyed by [`CellKey`]
pub type CellIndex = AHashMap<CellKey, Vec<usize>>;

impl SpikingDataset {
    pub fn new(records: Vec<SpikeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SpikeRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [SpikeRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn unique_trials_groups(&self) -> Vec<u32> {
        unique_in_order(self.records.iter().map(|r| r.trials_group))
    }

    pub fn unique_k_conditions(&self) -> Vec<u32> {
        unique_in_order(self.records.iter().map(|r| r.k_condition))
    }

    pub fn unique_pathways(&self) -> Vec<u32> {
        unique_in_order(self.records.iter().map(|r| r.pathway))
    }

    pub fn unique_learning_times(&self) -> Vec<f64> {
        unique_in_order(self.records.iter().map(|r| r.learning_time))
    }

    /// Group row indices by cell; cells and rows keep their first-appearance order
    pub fn cells(&self) -> Vec<(CellKey, Vec<usize>)> {
        let mut order: Vec<(CellKey, Vec<usize>)> = Vec::new();
        let mut position: AHashMap<CellKey, usize> = AHashMap::new();
        for (row, record) in self.records.iter().enumerate() {
            let key = record.cell_key();
            let slot = *position.entry(key).or_insert_with(|| {
                order.push((key, Vec::new()));
                order.len() - 1
            });
            order[slot].1.push(row);
        }
        order
    }

    /// Lookup table from cell to row indices
    pub fn cell_index(&self) -> CellIndex {
        self.cells().into_iter().collect()
    }

    /// Records of one cell
    pub fn filter(&self, k_condition: u32, pathway: u32, learning_time: f64, trials_group: u32) -> Vec<&SpikeRecord> {
        let key = CellKey {
            trials_group,
            k_condition,
            pathway,
            learning_time,
        };
        self.records.iter().filter(|r| r.cell_key() == key).collect()
    }
}

/// One count column across `rows`
pub fn column(rows: &[&SpikeRecord], regime: Regime, population: Population, scope: SourceScope) -> Vec<f64> {
    rows.iter()
        .map(|r| r.counts(regime).count(population, scope))
        .collect()
}

fn unique_in_order<T: PartialEq + Copy>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen: Vec<T> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
