#![deny(missing_docs)]
//! Shared logging utilities for the jobhunt workspace.
//!
//! This crate provides the `hunt_*` logging macros used across the codebase,
//! the logger set-up used by the `jobhunt` binary, and a minimal test
//! initializer for the global logger.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./jobhunt.log";

/// `log::trace!` under the workspace's own name.
#[macro_export]
macro_rules! hunt_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// `log::info!` under the workspace's own name.
#[macro_export]
macro_rules! hunt_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// `log::debug!` under the workspace's own name.
#[macro_export]
macro_rules! hunt_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// `log::warn!` under the workspace's own name.
#[macro_export]
macro_rules! hunt_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// `log::error!` under the workspace's own name.
#[macro_export]
macro_rules! hunt_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where `jobhunt` sends its log records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file only.
    File(PathBuf),
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both the file and the terminal.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

/// Initialize the global logger with the specified destination and level.
///
/// A log file that cannot be created is reported on stderr and skipped; the
/// session keeps running without it.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = session_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => {
            vec![TermLogger::new(
                level,
                config,
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(&path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Terminal logger for test binaries, at debug level for `jobhunt*` modules.
///
/// Every test file calls this; only the first call installs anything.
pub fn initialize_for_tests() {
    let config = ConfigBuilder::new()
        .add_filter_allow_str(WORKSPACE_PREFIX)
        .build();
    let _ = TermLogger::init(
        LevelFilter::Debug,
        config,
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}

/// Module paths of this workspace all start with this.
const WORKSPACE_PREFIX: &str = "jobhunt";

// Records from hyper and rustls are dropped.
fn session_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str(WORKSPACE_PREFIX)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
