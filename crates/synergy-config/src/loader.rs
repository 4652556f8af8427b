// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SynergyConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "synergy_configuration.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `SYNERGY_CONFIG_PATH` environment variable
/// 2. Current working directory: `./synergy_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SYNERGY_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SYNERGY_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SYNERGY_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SynergyConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SynergyConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Like [`load_config`], but falls back to built-in defaults when no file is
/// found by the automatic search. An explicit `config_path` or
/// `SYNERGY_CONFIG_PATH` must exist.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SynergyConfig> {
    let searched = config_path.is_none() && env::var_os("SYNERGY_CONFIG_PATH").is_none();
    match load_config(config_path, cli_args) {
        Err(ConfigError::FileNotFound(_)) if searched => {
            let mut config = SynergyConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        other => other,
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SYNERGY_DATA_DIR` -> `paths.data_dir`
/// - `SYNERGY_N_BINS` -> `binning.n_bins`
/// - `SYNERGY_N_SHIFTS` -> `binning.n_shifts`
/// - `SYNERGY_N_SURROGATES` -> `surrogates.n_surrogates`
/// - `SYNERGY_BASE_SEED` -> `surrogates.base_seed`
/// - `SYNERGY_SOURCE_SCOPE` -> `analysis.source_scope`
/// - `SYNERGY_ALPHA` -> `significance.alpha`
/// - `SYNERGY_LOG_LEVEL` -> `logging.level`
/// - `SYNERGY_LOG_DIR` -> `logging.log_dir`
pub fn apply_environment_overrides(config: &mut SynergyConfig) {
    let vars: HashMap<String, String> = [
        ("SYNERGY_DATA_DIR", "data_dir"),
        ("SYNERGY_N_BINS", "n_bins"),
        ("SYNERGY_N_SHIFTS", "n_shifts"),
        ("SYNERGY_N_SURROGATES", "n_surrogates"),
        ("SYNERGY_BASE_SEED", "base_seed"),
        ("SYNERGY_SOURCE_SCOPE", "source_scope"),
        ("SYNERGY_ALPHA", "alpha"),
        ("SYNERGY_LOG_LEVEL", "log_level"),
        ("SYNERGY_LOG_DIR", "log_dir"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"data_dir": "/data", "n_surrogates": "20"}`)
///
/// Values that fail to parse are ignored.
pub fn apply_cli_overrides(config: &mut SynergyConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("data_dir") {
        config.paths.data_dir = PathBuf::from(value);
    }

    if let Some(value) = cli_args.get("n_bins") {
        if let Ok(n_bins) = value.parse::<usize>() {
            config.binning.n_bins = n_bins;
        }
    }
    if let Some(value) = cli_args.get("n_shifts") {
        if let Ok(n_shifts) = value.parse::<usize>() {
            config.binning.n_shifts = n_shifts;
        }
    }

    if let Some(value) = cli_args.get("n_surrogates") {
        if let Ok(n) = value.parse::<usize>() {
            config.surrogates.n_surrogates = n;
        }
    }
    if let Some(value) = cli_args.get("base_seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.surrogates.base_seed = seed;
        }
    }

    if let Some(value) = cli_args.get("source_scope") {
        config.analysis.source_scope = value.to_lowercase();
    }
    if let Some(value) = cli_args.get("schemes") {
        config.analysis.schemes = split_list(value);
    }
    if let Some(value) = cli_args.get("regimes") {
        config.analysis.regimes = split_list(value);
    }

    if let Some(value) = cli_args.get("alpha") {
        if let Ok(alpha) = value.parse::<f64>() {
            config.significance.alpha = alpha;
        }
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_dir") {
        config.logging.log_dir = PathBuf::from(value);
        config.logging.file_logging = true;
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("SYNERGY_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("SYNERGY_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("SYNERGY_CONFIG_PATH", "/definitely/not/here.toml");
        let result = find_config_file();
        env::remove_var("SYNERGY_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[binning]").unwrap();
        writeln!(file, "n_bins = 6").unwrap();
        writeln!(file, "[surrogates]").unwrap();
        writeln!(file, "n_surrogates = 25").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.binning.n_bins, 6);
        assert_eq!(config.binning.n_shifts, 3);
        assert_eq!(config.surrogates.n_surrogates, 25);
        assert_eq!(config.analysis.source_scope, "pathway");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[binning\nn_bins = ").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = SynergyConfig::default();

        env::set_var("SYNERGY_DATA_DIR", "/tmp/spikes");
        env::set_var("SYNERGY_N_SURROGATES", "3");
        env::set_var("SYNERGY_ALPHA", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("SYNERGY_DATA_DIR");
        env::remove_var("SYNERGY_N_SURROGATES");
        env::remove_var("SYNERGY_ALPHA");

        assert_eq!(config.paths.data_dir, PathBuf::from("/tmp/spikes"));
        assert_eq!(config.surrogates.n_surrogates, 3);
        assert_eq!(config.significance.alpha, 0.05);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = SynergyConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("schemes".to_string(), "Hebbian, Hebbian_scaling".to_string());
        cli_args.insert("regimes".to_string(), "tonic".to_string());
        cli_args.insert("source_scope".to_string(), "ALL".to_string());
        cli_args.insert("log_dir".to_string(), "run_logs".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.analysis.schemes, vec!["Hebbian", "Hebbian_scaling"]);
        assert_eq!(config.analysis.regimes, vec!["tonic"]);
        assert_eq!(config.analysis.source_scope, "all");
        assert!(config.logging.file_logging);
        assert_eq!(config.logging.log_dir, PathBuf::from("run_logs"));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[binning]").unwrap();
        writeln!(file, "n_bins = 8").unwrap();
        writeln!(file, "n_shifts = 2").unwrap();

        env::set_var("SYNERGY_N_BINS", "12");
        env::set_var("SYNERGY_N_SHIFTS", "4");

        let mut cli_args = HashMap::new();
        cli_args.insert("n_bins".to_string(), "16".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("SYNERGY_N_BINS");
        env::remove_var("SYNERGY_N_SHIFTS");

        // CLI wins for n_bins, env wins for n_shifts (no CLI override)
        assert_eq!(config.binning.n_bins, 16);
        assert_eq!(config.binning.n_shifts, 4);
    }

    #[test]
    fn test_load_or_default_requires_explicit_path_to_exist() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let result = load_config_or_default(Some(&missing), None);
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_load_or_default_rejects_missing_env_path() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        env::set_var("SYNERGY_CONFIG_PATH", &missing);
        let result = load_config_or_default(None, None);
        env::remove_var("SYNERGY_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
