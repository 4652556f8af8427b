// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Whitespace-separated `.dat` files written by the simulator
//!
//! One file per trial group. Blank lines and `#` comments are ignored; every
//! other line must carry exactly 19 numeric columns.

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use tracing::{debug, info};

use crate::dataset::SpikingDataset;
use crate::error::{SpikingError, SpikingResult};
use crate::types::{PlasticityScheme, SpikeRecord};

/// Parse one `.dat` file, tagging every record with `trials_group`
pub fn read_data(path: &Path, trials_group: u32) -> SpikingResult<Vec<SpikeRecord>> {
    let text = fs::read_to_string(path).map_err(|source| SpikingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = match raw.split_once('#') {
            Some((data, _comment)) => data,
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let parse_error = |message: String| SpikingError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            message,
        };
        let values = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| parse_error(format!("invalid number '{}'", token)))
            })
            .collect::<SpikingResult<Vec<f64>>>()?;
        records.push(SpikeRecord::from_columns(&values, trials_group).map_err(parse_error)?);
    }

    debug!(
        target: "synergy-spiking",
        "Read {} records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Sorted `.dat` files of one scheme under the spiking data directory
pub fn spiking_files(spiking_dir: &Path, scheme: PlasticityScheme) -> SpikingResult<Vec<PathBuf>> {
    let dir = spiking_dir.join(scheme.dir_name());
    let entries = fs::read_dir(&dir).map_err(|source| SpikingError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| SpikingError::Io {
                path: dir.clone(),
                source,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "dat") {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(SpikingError::NoSpikingFiles(dir));
    }
    Ok(files)
}

/// Trial group of a file: trailing integer of the stem, else `fallback`
pub fn trials_group_id(path: &Path, fallback: u32) -> u32 {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    digits_start
        .and_then(|start| stem[start..].parse().ok())
        .unwrap_or(fallback)
}

/// Read every file into one dataset, one trial group per file
///
/// Two files resolving to the same group id are rejected with
/// [`SpikingError::DuplicateTrialsGroup`] before any file is read.
pub fn combine_data(files: &[PathBuf]) -> SpikingResult<SpikingDataset> {
    let mut owners: AHashMap<u32, &PathBuf> = AHashMap::with_capacity(files.len());
    let mut groups = Vec::with_capacity(files.len());
    for (index, path) in files.iter().enumerate() {
        let group = trials_group_id(path, index as u32);
        if let Some(first) = owners.insert(group, path) {
            return Err(SpikingError::DuplicateTrialsGroup {
                group,
                first: first.clone(),
                second: path.clone(),
            });
        }
        groups.push(group);
    }

    let mut records = Vec::new();
    for (path, group) in files.iter().zip(groups) {
        records.extend(read_data(path, group)?);
    }
    info!(
        target: "synergy-spiking",
        "Combined {} records from {} files",
        records.len(),
        files.len()
    );
    Ok(SpikingDataset::new(records))
}
