// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # synergy-observability
//!
//! Logging setup shared by the synergy-pid crates and binary.
//!
//! Each crate logs through `tracing` with its own `target:`; this crate turns
//! per-crate debug flags into an `EnvFilter` and installs the subscriber.
//!
//! ## Features
//! - `file-logging`: per-run JSON log files with retention cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known crate names for debug flags (also used as tracing targets)
pub const KNOWN_CRATES: &[&str] = &[
    "synergy-config",
    "synergy-infotheory",
    "synergy-stats",
    "synergy-spiking",
    "synergy-analysis",
    "synergy-pid",
];
