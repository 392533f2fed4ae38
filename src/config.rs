// ⚙️ Configuration - environment variables (with optional .env)

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_SNAPSHOT_DIR: &str = "scraped_events_save";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of event snapshot JSON files
    pub snapshot_dir: PathBuf,

    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// Where CSV exports are written
    pub export_dir: PathBuf,
}

impl Config {
    /// Load `.env` if present, then read `ULTRASKATE_*` variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot_dir = lookup("ULTRASKATE_SNAPSHOT_DIR")
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_DIR.to_string());

        let bind_raw =
            lookup("ULTRASKATE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid ULTRASKATE_BIND_ADDR: '{}'", bind_raw))?;

        let export_dir = lookup("ULTRASKATE_EXPORT_DIR").unwrap_or_else(|| ".".to_string());

        Ok(Config {
            snapshot_dir: PathBuf::from(snapshot_dir),
            bind_addr,
            export_dir: PathBuf::from(export_dir),
        })
    }
}
