// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! Supports flags like `--debug-synergy-analysis` or `--debug-all`, and the
//! `SYNERGY_DEBUG` environment variable.

use std::collections::HashSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates whose log output is raised to DEBUG
///
/// # Example
/// ```rust
/// use synergy_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-synergy-analysis".to_string()]);
/// assert!(flags.is_enabled("synergy-analysis"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all`
    /// enables every known crate.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }
            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }

        flags
    }

    /// Parse a comma-separated list such as `SYNERGY_DEBUG=synergy-stats,synergy-spiking`
    pub fn merge_list(&mut self, list: &str) {
        if list.trim() == "all" {
            self.enable_all();
            return;
        }
        for crate_name in list.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string());
            }
        }
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string());
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Build an `EnvFilter` directive string
    ///
    /// Format: `synergy-analysis=debug,info`, or just the base level when no
    /// crate is enabled.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        let mut names: Vec<&String> = self.enabled_crates.iter().collect();
        names.sort();

        let mut filters: Vec<String> = names
            .into_iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .collect();
        filters.push(base_level.to_lowercase());
        filters.join(",")
    }
}

/// Debug flags from the process arguments and `SYNERGY_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(list) = env::var("SYNERGY_DEBUG") {
        flags.merge_list(&list);
    }
    flags
}

/// Help text for the debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  SYNERGY_DEBUG={{crate-name}}[,{{crate-name}}]
  SYNERGY_DEBUG=all
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-synergy-stats".to_string()]);
        assert!(flags.is_enabled("synergy-stats"));
        assert!(!flags.is_enabled("synergy-analysis"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_merge_list() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_list(" synergy-spiking, ,synergy-infotheory");
        assert!(flags.is_enabled("synergy-spiking"));
        assert!(flags.is_enabled("synergy-infotheory"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-synergy-stats".to_string(),
            "--debug-synergy-analysis".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("WARN"),
            "synergy-analysis=debug,synergy-stats=debug,warn"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }
}
