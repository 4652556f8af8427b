// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! On-disk layout of result tables
//!
//! ```text
//! <results>/<scheme>/trials_results_<regime>.json
//! <results>/<scheme>/final_results_<regime>.json
//! <results>/<scheme>/p_values_<regime>.json
//! <surrogates>/<scheme>/trials_surrogate_<seed>_<regime>.json
//! <figures>/<scheme>/<regime>/pid_k<k>_pw<pathway>.json
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use synergy_spiking::{PlasticityScheme, Regime};

use crate::error::{AnalysisError, AnalysisResult};

const JSON_EXTENSION: &str = "json";

pub fn scheme_dir(root: &Path, scheme: PlasticityScheme) -> PathBuf {
    root.join(scheme.dir_name())
}

pub fn trials_results_file(results_root: &Path, scheme: PlasticityScheme, regime: Regime) -> PathBuf {
    scheme_dir(results_root, scheme).join(format!("trials_results_{}.{}", regime, JSON_EXTENSION))
}

pub fn final_results_file(results_root: &Path, scheme: PlasticityScheme, regime: Regime) -> PathBuf {
    scheme_dir(results_root, scheme).join(format!("final_results_{}.{}", regime, JSON_EXTENSION))
}

pub fn p_values_file(results_root: &Path, scheme: PlasticityScheme, regime: Regime) -> PathBuf {
    scheme_dir(results_root, scheme).join(format!("p_values_{}.{}", regime, JSON_EXTENSION))
}

pub fn surrogate_file(
    surrogates_root: &Path,
    scheme: PlasticityScheme,
    regime: Regime,
    seed: u64,
) -> PathBuf {
    scheme_dir(surrogates_root, scheme).join(format!(
        "trials_surrogate_{}_{}.{}",
        seed, regime, JSON_EXTENSION
    ))
}

pub fn figure_dir(figures_root: &Path, scheme: PlasticityScheme, regime: Regime) -> PathBuf {
    scheme_dir(figures_root, scheme).join(regime.name())
}

/// Seed encoded in a surrogate file name written for `regime`
pub fn parse_surrogate_seed(path: &Path, regime: Regime) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let rest = name.strip_prefix("trials_surrogate_")?;
    let rest = rest.strip_suffix(&format!("_{}.{}", regime, JSON_EXTENSION))?;
    rest.parse().ok()
}

/// Surrogate files of one scheme and regime, ordered by seed
pub fn surrogate_files(
    surrogates_root: &Path,
    scheme: PlasticityScheme,
    regime: Regime,
) -> AnalysisResult<Vec<(u64, PathBuf)>> {
    let dir = scheme_dir(surrogates_root, scheme);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(&dir).map_err(|source| AnalysisError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| AnalysisError::Io {
                path: dir.clone(),
                source,
            })?
            .path();
        if let Some(seed) = parse_surrogate_seed(&path, regime) {
            files.push((seed, path));
        }
    }
    files.sort();
    Ok(files)
}

/// Serialize `value` to `path`, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> AnalysisResult<()> {
    let io_error = |source: std::io::Error| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| AnalysisError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

/// Read a table written by [`write_json`]; a missing file is `MissingInput`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> AnalysisResult<T> {
    if !path.is_file() {
        return Err(AnalysisError::MissingInput(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| AnalysisError::Json {
        path: path.to_path_buf(),
        source,
    })
}
