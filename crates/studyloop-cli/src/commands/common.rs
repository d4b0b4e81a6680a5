//! Arguments and helpers shared by the analysis commands.

use std::path::PathBuf;

use chrono::{FixedOffset, Local};
use clap::Args;
use serde::Serialize;

use studyloop_core::{Config, ConfigError, InMemoryActivityLog};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Attempt log and the user whose attempts are read.
#[derive(Args)]
pub struct LogArgs {
    /// JSON array of attempt records
    #[arg(long)]
    pub log: PathBuf,
    /// User id
    #[arg(long)]
    pub user: String,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl LogArgs {
    pub fn open(&self) -> Result<InMemoryActivityLog, Box<dyn std::error::Error>> {
        let log = InMemoryActivityLog::from_json_file(&self.log)?;
        tracing::debug!(path = %self.log.display(), attempts = log.len(), "attempt log opened");
        Ok(log)
    }
}

/// Offset used to read hours of day, in minutes east of UTC.
///
/// Falls back to the machine's local offset.
pub fn utc_offset(minutes: Option<i32>) -> Result<FixedOffset, Box<dyn std::error::Error>> {
    match minutes {
        Some(m) => FixedOffset::east_opt(m.saturating_mul(60))
            .ok_or_else(|| format!("utc offset out of range: {m} minutes").into()),
        None => Ok(*Local::now().offset()),
    }
}

/// Config from disk. A malformed file is an error, not a silent fallback.
pub fn load_config() -> Result<Config, ConfigError> {
    Config::load()
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn rule() -> String {
    "=".repeat(50)
}
