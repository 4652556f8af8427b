// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use synergy_spiking::CellKey;
use thiserror::Error;

use crate::terms::{ConditionKey, SourceSet};

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Spiking(#[from] synergy_spiking::SpikingError),

    #[error("Information estimate failed: {0}")]
    Info(#[from] synergy_infotheory::InfoError),

    #[error("Statistical test failed: {0}")]
    Stats(#[from] synergy_stats::StatsError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No spiking records for {0}")]
    EmptyCell(CellKey),

    #[error("Source set {set:?} has {actual} sources, expected {expected}")]
    SourceArity {
        set: SourceSet,
        expected: usize,
        actual: usize,
    },

    #[error("Required input missing: {0}")]
    MissingInput(PathBuf),

    #[error("No surrogate rows for condition {0}")]
    MissingSurrogateCondition(ConditionKey),

    #[error("No figure layout for k_condition {0}")]
    UnsupportedCondition(u32),

    #[error("No summary rows for k_condition {k_condition}, pathway {pathway}")]
    NoSummaryRows { k_condition: u32, pathway: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),
}
