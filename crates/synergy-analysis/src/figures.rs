// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Figure specifications
//!
//! A figure is one (k_condition, pathway) pair: each labelled PID term is a
//! line over learning time with standard-deviation error bars. Figures are
//! stored as JSON specifications; rendering is left to external tooling.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::PidSummary;
use crate::error::{AnalysisError, AnalysisResult};
use crate::significance::PValueRow;
use crate::storage::write_json;
use crate::terms::PidTerm;

pub const Y_LABEL: &str = "Bits";
pub const X_LABEL: &str = "Time (mins)";

/// Line colours, assigned to series in order
pub const PLOT_COLOURS: [&str; 6] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b"];

static FULL_LABELS: [(PidTerm, &str); 6] = [
    (PidTerm::Mi, "Mutual information"),
    (PidTerm::U1, "Unique (excitatory)"),
    (PidTerm::U2, "Unique (inhibitory 1)"),
    (PidTerm::U3, "Unique (inhibitory 2)"),
    (PidTerm::R, "Redundancy"),
    (PidTerm::Sy, "Synergy"),
];

static IN1_SILENCED_LABELS: [(PidTerm, &str); 4] = [
    (PidTerm::Mi13, "Mutual information"),
    (PidTerm::Un13, "Unique (excitatory)"),
    (PidTerm::R13, "Redundancy"),
    (PidTerm::Sy13, "Synergy"),
];

static IN2_SILENCED_LABELS: [(PidTerm, &str); 4] = [
    (PidTerm::Mi12, "Mutual information"),
    (PidTerm::Un12, "Unique (excitatory)"),
    (PidTerm::R12, "Redundancy"),
    (PidTerm::Sy12, "Synergy"),
];

/// Terms drawn for a k_condition, with their legend labels
pub fn term_labels(k_condition: u32) -> AnalysisResult<&'static [(PidTerm, &'static str)]> {
    match k_condition {
        1 => Ok(&FULL_LABELS),
        2 => Ok(&IN1_SILENCED_LABELS),
        3 => Ok(&IN2_SILENCED_LABELS),
        other => Err(AnalysisError::UnsupportedCondition(other)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub learning_time: f64,
    pub mean: f64,
    /// Error bar half-height, absent for a single trial group
    pub std: Option<f64>,
    pub p_value: Option<f64>,
    pub significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub term: PidTerm,
    pub label: String,
    pub colour: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
    pub title: String,
    pub k_condition: u32,
    pub pathway: u32,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl FigureSpec {
    /// `pid_k<k>_pw<pathway>.json`
    pub fn file_name(&self) -> String {
        format!("pid_k{}_pw{}.json", self.k_condition, self.pathway)
    }

    pub fn write(&self, dir: &Path) -> AnalysisResult<PathBuf> {
        let path = dir.join(self.file_name());
        write_json(&path, self)?;
        debug!(target: "synergy-analysis", "Wrote figure {}", path.display());
        Ok(path)
    }
}

/// Build the figure of one condition and pathway
///
/// `p_values`, when given, annotates every point; a point is significant
/// when its p-value is below `alpha`.
pub fn plot_pid(
    summary: &[PidSummary],
    k_condition: u32,
    pathway: u32,
    p_values: Option<&[PValueRow]>,
    alpha: f64,
) -> AnalysisResult<FigureSpec> {
    let labels = term_labels(k_condition)?;
    let mut selected: Vec<&PidSummary> = summary
        .iter()
        .filter(|s| s.key.k_condition == k_condition && s.key.pathway == pathway)
        .collect();
    if selected.is_empty() {
        return Err(AnalysisError::NoSummaryRows {
            k_condition,
            pathway,
        });
    }
    selected.sort_by(|a, b| a.key.cmp(&b.key));

    let series = labels
        .iter()
        .zip(PLOT_COLOURS.iter().cycle())
        .map(|(&(term, label), &colour)| Series {
            term,
            label: label.to_string(),
            colour: colour.to_string(),
            points: selected
                .iter()
                .map(|s| {
                    let p_value = p_values
                        .and_then(|rows| rows.iter().find(|row| row.key == s.key))
                        .and_then(|row| row.get(term));
                    SeriesPoint {
                        learning_time: s.key.learning_time,
                        mean: s.mean.get(term),
                        std: s.std.map(|std| std.get(term)),
                        p_value,
                        significant: p_value.is_some_and(|p| p < alpha),
                    }
                })
                .collect(),
        })
        .collect();

    Ok(FigureSpec {
        title: format!("k = {}, pathway {}", k_condition, pathway),
        k_condition,
        pathway,
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        series,
    })
}

/// Distinct (k_condition, pathway) pairs of a summary, in table order
pub fn figure_conditions(summary: &[PidSummary]) -> Vec<(u32, u32)> {
    let mut pairs: Vec<(u32, u32)> = Vec::new();
    for s in summary {
        let pair = (s.key.k_condition, s.key.pathway);
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}
