use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use jobhunt_core::OwnerId;
use jobhunt_engine::WorkerSettings;
use jobhunt_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no user given; pass --user or set JOBHUNT_USER")]
    MissingUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

/// Search job boards through a remote browser worker.
#[derive(Debug, Parser)]
#[command(name = "jobhunt", version)]
pub struct Cli {
    /// Base URL of the browser-automation worker.
    #[arg(long, env = "JOBHUNT_API_URL", default_value = "http://localhost:8000", global = true)]
    pub api_url: String,

    /// Identity that owns saved jobs.
    #[arg(long, env = "JOBHUNT_USER", global = true)]
    pub user: Option<String>,

    /// Where saved jobs and the latest snapshot are written.
    #[arg(long, env = "JOBHUNT_DATA_DIR", default_value = ".", global = true)]
    pub data_dir: PathBuf,

    /// Milliseconds between status polls; at least 1.
    #[arg(
        long,
        default_value_t = 2000,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub poll_interval_ms: u64,

    #[arg(long, default_value_t = 1000, global = true)]
    pub refresh_delay_ms: u64,

    #[arg(long, default_value_t = 30, global = true)]
    pub request_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    #[arg(long, default_value = DEFAULT_LOG_FILE, global = true)]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a search and follow it until you quit.
    Search {
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        query: String,
        /// Width the snapshot is shown at; clicks are given in that scale.
        #[arg(long)]
        display_width: Option<u32>,
    },
    /// Manage saved jobs.
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum SavedAction {
    List,
    Remove { id: String },
}

impl Cli {
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            base_url: self.api_url.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..WorkerSettings::default()
        }
    }

    pub fn owner(&self) -> Result<OwnerId, ConfigError> {
        self.user
            .as_deref()
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(OwnerId::new)
            .ok_or(ConfigError::MissingUser)
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
