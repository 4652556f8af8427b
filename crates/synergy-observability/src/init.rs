// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always installed. With the `file-logging` feature a
//! timestamped run folder is created as well:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── synergy-pid.log   (JSON, all crates)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Where and how long log files are kept
#[derive(Debug, Clone)]
pub struct LogFileSettings {
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

/// Keeps file writers alive; logs are flushed when this is dropped
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    run_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Folder of the current run's log files, if file logging is active
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

/// Install the global subscriber
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags
/// * `base_level` - Level for everything not raised by a flag (e.g. "info")
/// * `files` - Optional log file settings; ignored without the `file-logging` feature
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    base_level: &str,
    files: Option<&LogFileSettings>,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(base_level);
    let env_filter = EnvFilter::try_new(&filter)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", filter, e))?;

    let mut layers = Vec::new();
    #[allow(unused_mut)]
    let mut guard = LoggingGuard::default();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(debug_flags.any_enabled())
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter)
        .boxed();
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    {
        if let Some(settings) = files {
            let (layer, file_guard, run_dir) = file_layer(settings, &filter)?;
            layers.push(layer);
            guard._file_guards.push(file_guard);
            guard.run_dir = Some(run_dir);
        }
    }
    #[cfg(not(feature = "file-logging"))]
    {
        if files.is_some() {
            eprintln!("Warning: file logging requested but the `file-logging` feature is disabled");
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}

#[cfg(feature = "file-logging")]
fn file_layer(
    settings: &LogFileSettings,
    filter: &str,
) -> Result<(
    Box<dyn Layer<Registry> + Send + Sync>,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    use anyhow::Context;
    use chrono::Utc;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_dir = settings.log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create log directory: {}", run_dir.display()))?;

    cleanup_old_logs(
        &settings.log_dir,
        settings.retention_days,
        settings.retention_runs,
    )?;

    let appender = tracing_appender::rolling::never(&run_dir, "synergy-pid.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_new(filter)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", filter, e))?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(env_filter)
        .boxed();

    Ok((layer, guard, run_dir))
}

/// Remove run folders older than `retention_days`, then trim to the newest
/// `retention_runs` folders. Folders not named `run_<YYYYmmdd_HHMMSS>` are left alone.
#[cfg(feature = "file-logging")]
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    use chrono::{DateTime, NaiveDateTime, Utc};

    if !base_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
        if let Some(naive) = stamp {
            runs.push((path, naive.and_utc()));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let mut keep = Vec::new();
    let mut removed = 0;
    for (path, dt) in runs {
        if dt < cutoff {
            remove_run(&path, &mut removed);
        } else {
            keep.push(path);
        }
    }

    if keep.len() > retention_runs {
        let excess = keep.len() - retention_runs;
        for path in keep.iter().take(excess) {
            remove_run(path, &mut removed);
        }
    }

    Ok(removed)
}

#[cfg(feature = "file-logging")]
fn remove_run(path: &Path, removed: &mut usize) {
    match std::fs::remove_dir_all(path) {
        Ok(()) => *removed += 1,
        Err(e) => eprintln!(
            "Warning: Failed to remove old log directory {}: {}",
            path.display(),
            e
        ),
    }
}
