//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::DEFAULT_ENDPOINT;
use crate::state::REFRESH_INTERVAL;

pub const DEFAULT_LOG_FILE: &str = "skyboard.log";

/// Terminal dashboard for AI-generated weather insights
#[derive(Parser, Debug, Clone)]
#[command(name = "skyboard", version)]
#[command(about = "Terminal dashboard for AI-generated weather insights")]
pub struct Config {
    /// Weather insights endpoint
    #[arg(long, env = "SKYBOARD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Auto-refresh period in milliseconds
    #[arg(
        long,
        env = "SKYBOARD_REFRESH_MS",
        default_value_t = REFRESH_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub refresh_interval_ms: u64,

    /// Log file [default: <temp dir>/skyboard.log]
    #[arg(long, env = "SKYBOARD_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
    }
}
