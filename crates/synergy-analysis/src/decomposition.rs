// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-cell decompositions and the full PID table

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use synergy_config::BinningConfig;
use synergy_infotheory::{decompose2, decompose3, Estimator, Pid2, Pid3};
use synergy_spiking::{column, CellKey, Population, Regime, SourceScope, SpikeRecord, SpikingDataset};
use tracing::{debug, info};

use crate::error::{AnalysisError, AnalysisResult};
use crate::terms::{PidRow, PidTerms, SourceSet};

/// Estimator parameters and source selection shared by every cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidSettings {
    pub n_bins: usize,
    pub n_shifts: usize,
    pub decimals: u32,
    pub scope: SourceScope,
}

impl Default for PidSettings {
    fn default() -> Self {
        Self::from_binning(&BinningConfig::default(), SourceScope::Pathway)
    }
}

impl PidSettings {
    pub fn from_binning(binning: &BinningConfig, scope: SourceScope) -> Self {
        Self {
            n_bins: binning.n_bins,
            n_shifts: binning.n_shifts,
            decimals: binning.decimals,
            scope,
        }
    }
}

/// Target column followed by the set's source columns
fn cell_matrix(
    rows: &[&SpikeRecord],
    set: SourceSet,
    regime: Regime,
    scope: SourceScope,
) -> Array2<f64> {
    let mut columns = vec![column(rows, regime, Population::Postsynaptic, scope)];
    columns.extend(
        set.sources()
            .iter()
            .map(|&population| column(rows, regime, population, scope)),
    );
    Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| columns[j][i])
}

fn estimator(
    rows: &[&SpikeRecord],
    set: SourceSet,
    regime: Regime,
    settings: &PidSettings,
    expected_sources: usize,
) -> AnalysisResult<Estimator> {
    let actual = set.sources().len();
    if actual != expected_sources {
        return Err(AnalysisError::SourceArity {
            set,
            expected: expected_sources,
            actual,
        });
    }
    let data = cell_matrix(rows, set, regime, settings.scope);
    Ok(Estimator::from_data(data.view(), settings.n_bins, settings.n_shifts)?)
}

/// Two sources, one target
pub fn pid_3d(
    rows: &[&SpikeRecord],
    set: SourceSet,
    regime: Regime,
    settings: &PidSettings,
) -> AnalysisResult<Pid2> {
    let est = estimator(rows, set, regime, settings, 2)?;
    Ok(decompose2(&est, 0, 1, 2)?.rounded(settings.decimals))
}

/// Three sources, one target
pub fn pid_4d(
    rows: &[&SpikeRecord],
    set: SourceSet,
    regime: Regime,
    settings: &PidSettings,
) -> AnalysisResult<Pid3> {
    let est = estimator(rows, set, regime, settings, 3)?;
    Ok(decompose3(&est, 0, 1, 2, 3)?.rounded(settings.decimals))
}

/// All terms of one cell, leaving non-applicable ones at 0
pub fn cell_terms(
    rows: &[&SpikeRecord],
    k_condition: u32,
    regime: Regime,
    settings: &PidSettings,
) -> AnalysisResult<PidTerms> {
    let mut terms = PidTerms::default();

    if SourceSet::Full.applies_to(k_condition) {
        let full = pid_4d(rows, SourceSet::Full, regime, settings)?;
        terms.mi = full.mi;
        terms.u1 = full.unique[0];
        terms.u2 = full.unique[1];
        terms.u3 = full.unique[2];
        terms.r = full.redundancy;
        terms.sy = full.synergy;
    }
    if SourceSet::ExExcluded.applies_to(k_condition) {
        let pid = pid_3d(rows, SourceSet::ExExcluded, regime, settings)?;
        terms.mi_23 = pid.mi;
        terms.r_23 = pid.redundancy;
        terms.sy_23 = pid.synergy;
        terms.un_23 = pid.unique[0];
    }
    if SourceSet::In1Excluded.applies_to(k_condition) {
        let pid = pid_3d(rows, SourceSet::In1Excluded, regime, settings)?;
        terms.mi_13 = pid.mi;
        terms.r_13 = pid.redundancy;
        terms.sy_13 = pid.synergy;
        terms.un_13 = pid.unique[0];
    }
    if SourceSet::In2Excluded.applies_to(k_condition) {
        let pid = pid_3d(rows, SourceSet::In2Excluded, regime, settings)?;
        terms.mi_12 = pid.mi;
        terms.r_12 = pid.redundancy;
        terms.sy_12 = pid.synergy;
        terms.un_12 = pid.unique[0];
    }

    Ok(terms)
}

/// PID table of a dataset: one row per (trial group, k, pathway, time)
///
/// Rows follow the first-appearance order of groups, then conditions, then
/// pathways, then learning times. Every combination must have records.
pub fn pid_analysis(
    dataset: &SpikingDataset,
    regime: Regime,
    settings: &PidSettings,
) -> AnalysisResult<Vec<PidRow>> {
    let index = dataset.cell_index();
    let k_values = dataset.unique_k_conditions();
    let pathways = dataset.unique_pathways();
    let times = dataset.unique_learning_times();

    let mut cells: Vec<(CellKey, Vec<&SpikeRecord>)> = Vec::new();
    for trials_group in dataset.unique_trials_groups() {
        debug!(
            target: "synergy-analysis",
            "Calculating PID for trials group {}",
            trials_group
        );
        for &k_condition in &k_values {
            for &pathway in &pathways {
                for &learning_time in &times {
                    let key = CellKey {
                        trials_group,
                        k_condition,
                        pathway,
                        learning_time,
                    };
                    let rows = index.get(&key).ok_or(AnalysisError::EmptyCell(key))?;
                    let records = rows.iter().map(|&i| &dataset.records()[i]).collect();
                    cells.push((key, records));
                }
            }
        }
    }

    let decompose = |(key, records): &(CellKey, Vec<&SpikeRecord>)| -> AnalysisResult<PidRow> {
        let terms = cell_terms(records, key.k_condition, regime, settings)?;
        Ok(PidRow { key: *key, terms })
    };

    #[cfg(feature = "parallel")]
    let rows: AnalysisResult<Vec<PidRow>> = {
        use rayon::prelude::*;
        cells.par_iter().map(decompose).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: AnalysisResult<Vec<PidRow>> = cells.iter().map(decompose).collect();

    let rows = rows?;
    info!(
        target: "synergy-analysis",
        "Decomposed {} cells ({} regime)",
        rows.len(),
        regime
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synergy_spiking::RegimeCounts;

    /// Target is the XOR of two binary pathway sources; the third is noise
    fn xor_records(k_condition: u32) -> Vec<SpikeRecord> {
        (0..64)
            .map(|i| {
                let a = (i & 1) as f64;
                let b = ((i >> 1) & 1) as f64;
                let c = ((i >> 2) & 1) as f64;
                SpikeRecord {
                    row_num: i as u64,
                    k_condition,
                    learning_time: 0.0,
                    pathway: 1,
                    step_input: 0.0,
                    phasic: RegimeCounts {
                        postsynaptic: ((a as u8) ^ (b as u8)) as f64,
                        ex_pathway: a,
                        in1_pathway: b,
                        in2_pathway: c,
                        ..Default::default()
                    },
                    tonic: RegimeCounts::default(),
                    trials_group: 0,
                }
            })
            .collect()
    }

    fn single_shift() -> PidSettings {
        PidSettings {
            n_bins: 2,
            n_shifts: 1,
            decimals: 4,
            scope: SourceScope::Pathway,
        }
    }

    #[test]
    fn test_pid_3d_xor_is_synergistic() {
        let records = xor_records(1);
        let rows: Vec<&SpikeRecord> = records.iter().collect();
        let pid = pid_3d(&rows, SourceSet::In2Excluded, Regime::Phasic, &single_shift()).unwrap();
        assert_eq!(pid.synergy, 1.0);
        assert_eq!(pid.redundancy, 0.0);
        assert_eq!(pid.mi, 1.0);
    }

    #[test]
    fn test_pid_3d_rejects_three_sources() {
        let records = xor_records(1);
        let rows: Vec<&SpikeRecord> = records.iter().collect();
        assert!(matches!(
            pid_3d(&rows, SourceSet::Full, Regime::Phasic, &single_shift()),
            Err(AnalysisError::SourceArity { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_cell_terms_follow_condition() {
        let records = xor_records(1);
        let rows: Vec<&SpikeRecord> = records.iter().collect();

        let full = cell_terms(&rows, 1, Regime::Phasic, &single_shift()).unwrap();
        assert_eq!(full.mi, 1.0);
        assert_eq!(full.sy_12, 1.0);
        assert_eq!(full.mi_13, 0.0);
        assert_eq!(full.mi_23, 0.0);

        let in1_silenced = cell_terms(&rows, 2, Regime::Phasic, &single_shift()).unwrap();
        assert_eq!(in1_silenced.mi, 0.0);
        assert_eq!(in1_silenced.sy_12, 0.0);
        assert_eq!(in1_silenced.mi_13, 0.0);

        let in2_silenced = cell_terms(&rows, 3, Regime::Phasic, &single_shift()).unwrap();
        assert_eq!(in2_silenced.sy_12, 1.0);
        assert_eq!(in2_silenced.mi_13, 0.0);
    }

    #[test]
    fn test_pid_analysis_requires_every_cell() {
        let mut records = xor_records(1);
        let mut other = xor_records(2);
        for record in &mut other {
            record.learning_time = 5.0;
        }
        records.extend(other);
        let dataset = SpikingDataset::new(records);

        // (k=1, t=5) and (k=2, t=0) never occur
        assert!(matches!(
            pid_analysis(&dataset, Regime::Phasic, &single_shift()),
            Err(AnalysisError::EmptyCell(_))
        ));
    }

    #[test]
    fn test_pid_analysis_row_order() {
        let mut records = Vec::new();
        for group in [3, 1] {
            for k in [1, 3] {
                records.extend(xor_records(k).into_iter().map(|mut r| {
                    r.trials_group = group;
                    r
                }));
            }
        }
        let dataset = SpikingDataset::new(records);
        let rows = pid_analysis(&dataset, Regime::Phasic, &single_shift()).unwrap();
        let order: Vec<(u32, u32)> = rows
            .iter()
            .map(|r| (r.key.trials_group, r.key.k_condition))
            .collect();
        assert_eq!(order, vec![(3, 1), (3, 3), (1, 1), (1, 3)]);
        assert_eq!(rows[1].terms.sy_12, 1.0);
        assert_eq!(rows[1].terms.mi, 0.0);
    }
}
