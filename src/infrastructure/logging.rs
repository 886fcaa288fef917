//! Logging system configuration and initialization
//!
//! This module provides the logging setup for the CLI:
//! - Console output with local-time timestamps
//! - Optional non-blocking file output (plain or JSON)
//! - Level control from configuration, overridable with `RUST_LOG`
//! - Rotation of the previous unified log file and cleanup of old ones

#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_STEM: &str = "storefront-harvest";

/// Dependencies whose logs are capped unless trace level is requested
const NOISY_TARGETS: [(&str, &str); 5] = [
    ("reqwest", "info"),
    ("hyper", "warn"),
    ("h2", "warn"),
    ("html5ever", "warn"),
    ("selectors", "warn"),
];

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local time with milliseconds and UTC offset
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory: configured, else `logs/` next to the executable
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(dir) = &config.log_dir {
        return dir.clone();
    }
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Log file name for the configured naming strategy
pub fn log_file_name(config: &LoggingConfig) -> String {
    match config.file_naming_strategy.as_str() {
        "timestamped" => format!("{}-{}.log", LOG_FILE_STEM, Local::now().format("%Y%m%d")),
        _ => format!("{}.log", LOG_FILE_STEM),
    }
}

/// Builds the env filter; `RUST_LOG` wins over the configuration
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e))?;

    if !config.level.to_lowercase().contains("trace") {
        for (target, level) in NOISY_TARGETS {
            filter = filter.add_directive(format!("{}={}", target, level).parse::<Directive>()?);
        }
    }

    for (module, level) in &config.module_filters {
        let directive = format!("{}={}", module, level)
            .parse::<Directive>()
            .with_context(|| format!("Invalid module filter {}={}", module, level))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Rotate existing log file by renaming it with its modification timestamp
fn rotate_existing_log_file(log_dir: &Path, log_file_name: &str) -> Result<()> {
    let log_file_path = log_dir.join(log_file_name);
    if !log_file_path.exists() {
        return Ok(());
    }

    let modified = std::fs::metadata(&log_file_path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let stamp: chrono::DateTime<Local> = modified.into();

    let file_stem = log_file_name.trim_end_matches(".log");
    let rotated = log_dir.join(format!("{}.{}.log", file_stem, stamp.format("%Y%m%dT%H%M%S")));

    std::fs::rename(&log_file_path, &rotated).with_context(|| {
        format!(
            "Failed to rotate log file {} to {}",
            log_file_path.display(),
            rotated.display()
        )
    })?;

    Ok(())
}

/// Delete the oldest `.log` files beyond `max_files`
fn cleanup_old_logs(log_dir: &Path, max_files: usize) -> Result<usize> {
    let mut log_files = Vec::new();
    for entry in std::fs::read_dir(log_dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "log") {
            if let Ok(modified) = std::fs::metadata(&path).and_then(|m| m.modified()) {
                log_files.push((path, modified));
            }
        }
    }

    // Newest first
    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in log_files.iter().skip(max_files) {
        match std::fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
    Ok(removed)
}

/// Initialize logging with custom configuration
///
/// Dependency noise (`reqwest`, `hyper`, `html5ever`, ...) is capped unless
/// the level contains `trace`. Set `RUST_LOG` to override filtering entirely:
/// ```bash
/// RUST_LOG="debug,reqwest=debug" storefront-harvest scrape urls.csv
/// ```
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(config)?;

    let mut log_target = None;
    let file_writer = if config.file_output {
        let log_dir = get_log_directory(config);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

        let file_name = log_file_name(config);
        if config.file_naming_strategy != "timestamped" {
            rotate_existing_log_file(&log_dir, &file_name)?;
        }
        let removed = cleanup_old_logs(&log_dir, config.max_files as usize)?;

        let (writer, guard) = non_blocking(rolling::never(&log_dir, &file_name));
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(guard);

        log_target = Some((log_dir.join(&file_name), removed));
        Some(writer)
    } else {
        None
    };

    let (json_file_layer, plain_file_layer) = match file_writer {
        Some(writer) if config.json_format => (
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            ),
            None,
        ),
        Some(writer) => (
            None,
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_timer(LocalTimeFormatter)
                    .with_target(false)
                    .with_ansi(false),
            ),
        ),
        None => (None, None),
    };

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    Registry::default()
        .with(env_filter)
        .with(json_file_layer)
        .with(plain_file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging system initialized (level: {})", config.level);
    if let Some((path, removed)) = log_target {
        info!("Log file: {:?} (removed {} old files)", path, removed);
    }

    Ok(())
}
