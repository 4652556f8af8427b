// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synergy-pid Configuration System
//!
//! Type-safe configuration loader for the PID analysis pipeline with support for:
//! - TOML file parsing (`synergy_configuration.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use synergy_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! println!("Spiking data: {}", config.paths.spiking_path().display());
//! println!("Bins per dimension: {}", config.binning.n_bins);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    load_config_or_default, CONFIG_FILE_NAME,
};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = SynergyConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: SynergyConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.binning.n_bins, config.binning.n_bins);
        assert_eq!(parsed.analysis.schemes, config.analysis.schemes);
    }

    #[test]
    fn test_example_config_is_valid() {
        let text = include_str!("../../../synergy_configuration.example.toml");
        let config: SynergyConfig = toml::from_str(text).unwrap();
        validate_config(&config).unwrap();
        assert_eq!(config.surrogates.n_surrogates, 10);
        assert_eq!(config.analysis.regimes, vec!["phasic", "tonic"]);
    }
}
