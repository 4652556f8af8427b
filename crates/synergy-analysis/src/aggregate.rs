// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Mean and spread of PID terms across trial groups

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use synergy_stats::{mean, sample_std};

use crate::terms::{ConditionKey, PidRow, PidTerm, PidTerms, SurrogatePidRow};

/// Summary of one condition over its trial groups (or surrogate seeds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidSummary {
    #[serde(flatten)]
    pub key: ConditionKey,
    /// Rows that went into the summary
    pub n: usize,
    pub mean: PidTerms,
    /// Sample standard deviation, absent with fewer than two rows
    pub std: Option<PidTerms>,
}

/// Rows grouped by condition, conditions in ascending order
pub fn group_by_condition<'a>(
    rows: impl IntoIterator<Item = &'a PidRow>,
) -> BTreeMap<ConditionKey, Vec<&'a PidTerms>> {
    let mut groups: BTreeMap<ConditionKey, Vec<&PidTerms>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(ConditionKey::from(&row.key))
            .or_default()
            .push(&row.terms);
    }
    groups
}

fn summarize(groups: BTreeMap<ConditionKey, Vec<&PidTerms>>) -> Vec<PidSummary> {
    groups
        .into_iter()
        .map(|(key, members)| {
            let values = |term: PidTerm| members.iter().map(|t| t.get(term)).collect::<Vec<f64>>();
            let mean = PidTerms::from_fn(|term| mean(&values(term)).unwrap_or(0.0));
            let std = (members.len() >= 2)
                .then(|| PidTerms::from_fn(|term| sample_std(&values(term)).unwrap_or(0.0)));
            PidSummary {
                key,
                n: members.len(),
                mean,
                std,
            }
        })
        .collect()
}

/// Final results table: every condition of the per-trial table summarised
pub fn aggregate(rows: &[PidRow]) -> Vec<PidSummary> {
    summarize(group_by_condition(rows))
}

/// Same summary over every seed of a surrogate table
pub fn aggregate_surrogates(rows: &[SurrogatePidRow]) -> Vec<PidSummary> {
    summarize(group_by_condition(rows.iter().map(|r| &r.row)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use synergy_spiking::CellKey;

    fn row(group: u32, k: u32, time: f64, sy: f64) -> PidRow {
        PidRow {
            key: CellKey {
                trials_group: group,
                k_condition: k,
                pathway: 9,
                learning_time: time,
            },
            terms: PidTerms {
                sy,
                mi: 1.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_aggregate_mean_and_std() {
        let rows = vec![
            row(0, 1, 5.0, 0.1),
            row(1, 1, 5.0, 0.3),
            row(2, 1, 5.0, 0.5),
            row(0, 1, 0.0, 0.2),
        ];
        let summary = aggregate(&rows);
        assert_eq!(summary.len(), 2);

        // sorted by learning time within (k, pathway)
        assert_eq!(summary[0].key.learning_time, 0.0);
        assert_eq!(summary[0].n, 1);
        assert!(summary[0].std.is_none());

        let five = &summary[1];
        assert_eq!(five.n, 3);
        assert!((five.mean.sy - 0.3).abs() < 1e-12);
        assert_eq!(five.mean.mi, 1.0);
        let std = five.std.unwrap();
        assert!((std.sy - 0.2).abs() < 1e-12);
        assert_eq!(std.mi, 0.0);
    }

    #[test]
    fn test_aggregate_surrogates_pools_seeds() {
        let rows: Vec<SurrogatePidRow> = (0..4)
            .map(|seed| SurrogatePidRow {
                row: row(0, 2, 1.0, seed as f64),
                random_seed: seed,
            })
            .collect();
        let summary = aggregate_surrogates(&rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].n, 4);
        assert!((summary[0].mean.sy - 1.5).abs() < 1e-12);
    }
}
