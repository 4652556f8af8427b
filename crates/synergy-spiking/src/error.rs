// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use thiserror::Error;

/// Result type for spiking data operations
pub type SpikingResult<T> = Result<T, SpikingError>;

#[derive(Error, Debug)]
pub enum SpikingError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("No .dat spiking files found in {0}")]
    NoSpikingFiles(PathBuf),

    #[error("Trial group {group} claimed by both {first} and {second}")]
    DuplicateTrialsGroup {
        group: u32,
        first: PathBuf,
        second: PathBuf,
    },

    #[error(
        "Invalid condition provided: must be 'Hebbian', 'Hebbian_antiHebbian' or 'Hebbian_scaling' (got '{0}')"
    )]
    InvalidScheme(String),

    #[error("Invalid regime provided: must be 'phasic' or 'tonic' (got '{0}')")]
    InvalidRegime(String),

    #[error("Invalid source scope: must be 'pathway' or 'all' (got '{0}')")]
    InvalidScope(String),
}
