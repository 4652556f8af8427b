// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Real vs surrogate PID values
//!
//! For every condition the per-trial values of each term are compared with
//! the pooled values of all surrogate seeds by a two-sided Mann–Whitney U
//! test. A group holding a single distinct value has no rank information,
//! so its p-value is left undefined (`null` on disk).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use synergy_spiking::{PlasticityScheme, Regime};
use synergy_stats::{has_single_value, mann_whitney_u, Alternative};
use tracing::{debug, info};

use crate::aggregate::group_by_condition;
use crate::context::AnalysisContext;
use crate::error::{AnalysisError, AnalysisResult};
use crate::storage::{p_values_file, read_json, scheme_dir, surrogate_files, trials_results_file, write_json};
use crate::terms::{ConditionKey, PidRow, PidTerm, PidTerms, SurrogatePidRow};

/// p-values of every term for one condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PValueRow {
    #[serde(flatten)]
    pub key: ConditionKey,
    pub p_values: BTreeMap<PidTerm, Option<f64>>,
}

impl PValueRow {
    pub fn get(&self, term: PidTerm) -> Option<f64> {
        self.p_values.get(&term).copied().flatten()
    }
}

/// p-value of one term, `None` when either group is single-valued
pub fn term_p_value(results: &[&PidTerms], surrogates: &[&PidTerms], term: PidTerm) -> AnalysisResult<Option<f64>> {
    let x: Vec<f64> = results.iter().map(|t| t.get(term)).collect();
    let y: Vec<f64> = surrogates.iter().map(|t| t.get(term)).collect();
    if has_single_value(&x) || has_single_value(&y) {
        return Ok(None);
    }
    Ok(Some(mann_whitney_u(&x, &y, Alternative::TwoSided)?.p_value))
}

/// Compare per-trial results against surrogates, condition by condition
pub fn compare_with_surrogates(results: &[PidRow], surrogates: &[SurrogatePidRow]) -> AnalysisResult<Vec<PValueRow>> {
    let result_groups = group_by_condition(results);
    let surrogate_groups = group_by_condition(surrogates.iter().map(|s| &s.row));

    let mut rows = Vec::with_capacity(result_groups.len());
    for (key, result_group) in &result_groups {
        let surrogate_group = surrogate_groups
            .get(key)
            .ok_or(AnalysisError::MissingSurrogateCondition(*key))?;
        let mut p_values = BTreeMap::new();
        for term in PidTerm::ALL {
            p_values.insert(term, term_p_value(result_group, surrogate_group, term)?);
        }
        rows.push(PValueRow { key: *key, p_values });
    }
    Ok(rows)
}

/// Read every surrogate table of a scheme and regime
pub fn load_surrogates(ctx: &AnalysisContext, scheme: PlasticityScheme, regime: Regime) -> AnalysisResult<Vec<SurrogatePidRow>> {
    let files = surrogate_files(&ctx.surrogates_dir, scheme, regime)?;
    if files.is_empty() {
        return Err(AnalysisError::MissingInput(
            scheme_dir(&ctx.surrogates_dir, scheme).join(format!("trials_surrogate_*_{}.json", regime)),
        ));
    }
    let mut rows = Vec::new();
    for (seed, path) in files {
        let table: Vec<SurrogatePidRow> = read_json(&path)?;
        debug!(
            target: "synergy-analysis",
            "Loaded {} surrogate rows (seed {}) from {}",
            table.len(),
            seed,
            path.display()
        );
        rows.extend(table);
    }
    Ok(rows)
}

/// p-values of one scheme and regime from the stored tables
pub fn generate_p_values(ctx: &AnalysisContext, scheme: PlasticityScheme, regime: Regime) -> AnalysisResult<Vec<PValueRow>> {
    let surrogates = load_surrogates(ctx, scheme, regime)?;
    let results: Vec<PidRow> = read_json(&trials_results_file(&ctx.results_dir, scheme, regime))?;
    let p_values = compare_with_surrogates(&results, &surrogates)?;

    let tested = p_values.iter().flat_map(|row| row.p_values.values()).flatten().count();
    let significant = p_values
        .iter()
        .flat_map(|row| row.p_values.values())
        .flatten()
        .filter(|&&p| p < ctx.alpha)
        .count();
    info!(
        target: "synergy-analysis",
        "{} {}: {} of {} tested terms below alpha={}",
        scheme,
        regime,
        significant,
        tested,
        ctx.alpha
    );
    Ok(p_values)
}

/// Compute and store the p-value table; returns the path written
pub fn save_p_values(ctx: &AnalysisContext, scheme: PlasticityScheme, regime: Regime) -> AnalysisResult<std::path::PathBuf> {
    let p_values = generate_p_values(ctx, scheme, regime)?;
    let path = p_values_file(&ctx.results_dir, scheme, regime);
    write_json(&path, &p_values)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synergy_spiking::CellKey;

    fn row(group: u32, k: u32, sy: f64, mi: f64) -> PidRow {
        PidRow {
            key: CellKey {
                trials_group: group,
                k_condition: k,
                pathway: 1,
                learning_time: 0.0,
            },
            terms: PidTerms {
                sy,
                mi,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_single_valued_groups_have_no_p_value() {
        let results: Vec<PidRow> = (0..5).map(|g| row(g, 1, 1.0 + g as f64, 0.5)).collect();
        let surrogates: Vec<SurrogatePidRow> = (0..5)
            .map(|s| SurrogatePidRow {
                row: row(0, 1, 10.0 + s as f64, 0.25 * s as f64),
                random_seed: s,
            })
            .collect();

        let p = compare_with_surrogates(&results, &surrogates).unwrap();
        assert_eq!(p.len(), 1);
        // 5 vs 5 fully separated, exact two-sided test
        assert!((p[0].get(PidTerm::Sy).unwrap() - 2.0 / 252.0).abs() < 1e-12);
        // results mi is constant
        assert_eq!(p[0].get(PidTerm::Mi), None);
        // every other term is 0 everywhere
        assert_eq!(p[0].get(PidTerm::R13), None);
        assert_eq!(p[0].p_values.len(), 18);
    }

    #[test]
    fn test_missing_surrogate_condition() {
        let results = vec![row(0, 2, 0.1, 0.2)];
        let surrogates = vec![SurrogatePidRow {
            row: row(0, 1, 0.1, 0.2),
            random_seed: 0,
        }];
        assert!(matches!(
            compare_with_surrogates(&results, &surrogates),
            Err(AnalysisError::MissingSurrogateCondition(key)) if key.k_condition == 2
        ));
    }

    #[test]
    fn test_p_value_row_serializes_null() {
        let mut p_values = BTreeMap::new();
        p_values.insert(PidTerm::Sy, Some(0.01));
        p_values.insert(PidTerm::Mi, None);
        let row = PValueRow {
            key: ConditionKey {
                k_condition: 1,
                pathway: 9,
                learning_time: 20.0,
            },
            p_values,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value["p_values"]["mi"].is_null());
        assert_eq!(value["p_values"]["sy"], 0.01);
        let back: PValueRow = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);
    }
}
