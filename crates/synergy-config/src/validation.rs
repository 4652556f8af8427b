// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges and name known
//! schemes, regimes and source scopes before a run starts.

use crate::{ConfigError, ConfigResult, SynergyConfig, DEFAULT_REGIMES, DEFAULT_SCHEMES};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    OutOfRange { field: String, reason: String },
    UnknownName { field: String, value: String, allowed: Vec<String> },
    MissingRequired { field: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::UnknownName {
                field,
                value,
                allowed,
            } => write!(
                f,
                "Unknown value '{}' for {} (expected one of: {})",
                value,
                field,
                allowed.join(", ")
            ),
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_config(config: &SynergyConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_binning(config, &mut errors);
    validate_analysis(config, &mut errors);

    if config.surrogates.n_surrogates == 0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "surrogates.n_surrogates".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let alpha = config.significance.alpha;
    if !(alpha > 0.0 && alpha < 1.0) {
        errors.push(ConfigValidationError::OutOfRange {
            field: "significance.alpha".to_string(),
            reason: "must be between 0.0 and 1.0 (exclusive)".to_string(),
        });
    }

    if config.paths.data_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.data_dir".to_string(),
        });
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_binning(config: &SynergyConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.binning.n_bins < 2 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "binning.n_bins".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    if config.binning.n_shifts == 0 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "binning.n_shifts".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    // f64 carries ~15 significant decimal digits
    if config.binning.decimals > 15 {
        errors.push(ConfigValidationError::OutOfRange {
            field: "binning.decimals".to_string(),
            reason: "must be 15 or less".to_string(),
        });
    }
}

fn validate_analysis(config: &SynergyConfig, errors: &mut Vec<ConfigValidationError>) {
    let checks: [(&str, &Vec<String>, &[&str]); 2] = [
        ("analysis.schemes", &config.analysis.schemes, &DEFAULT_SCHEMES),
        ("analysis.regimes", &config.analysis.regimes, &DEFAULT_REGIMES),
    ];

    for (field, values, allowed) in checks {
        if values.is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: field.to_string(),
            });
        }
        for value in values {
            if !allowed.contains(&value.as_str()) {
                errors.push(ConfigValidationError::UnknownName {
                    field: field.to_string(),
                    value: value.clone(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
    }

    let scope = config.analysis.source_scope.as_str();
    if scope != "pathway" && scope != "all" {
        errors.push(ConfigValidationError::UnknownName {
            field: "analysis.source_scope".to_string(),
            value: scope.to_string(),
            allowed: vec!["pathway".to_string(), "all".to_string()],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynergyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_binning() {
        let mut config = SynergyConfig::default();
        config.binning.n_bins = 1;
        config.binning.n_shifts = 0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("binning.n_bins"));
                assert!(msg.contains("binning.n_shifts"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_scheme() {
        let mut config = SynergyConfig::default();
        config.analysis.schemes.push("antiHebbian".to_string());

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("antiHebbian"));
                assert!(msg.contains("Hebbian_scaling"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_alpha_and_scope() {
        let mut config = SynergyConfig::default();
        config.significance.alpha = 1.5;
        config.analysis.source_scope = "dendrite".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("significance.alpha"));
                assert!(msg.contains("analysis.source_scope"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_surrogates() {
        let mut config = SynergyConfig::default();
        config.surrogates.n_surrogates = 0;
        assert!(validate_config(&config).is_err());
    }
}
