//! On-disk state. Only the configuration file lives here; sessions are
//! kept in memory.

pub mod config;

pub use config::{Config, ExtractorConfig, ScheduleConfig, TimerConfig};

use std::path::PathBuf;

/// `studyplan-dev` when STUDYPLAN_ENV=dev, `studyplan` otherwise.
fn dir_name() -> &'static str {
    match std::env::var("STUDYPLAN_ENV").as_deref() {
        Ok("dev") => "studyplan-dev",
        _ => "studyplan",
    }
}

/// Returns `~/.config/studyplan[-dev]/`, creating it if needed.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(dir_name());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
