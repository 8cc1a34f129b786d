use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Process configuration, read once at startup.
///
/// Every field has a single-user default; the env vars exist so the recorder
/// and the server agree on shared paths without editing code.
#[derive(Debug, Clone)]
pub struct Config {
    /// Append-only sample log shared by recorder and server (DATA_FILE)
    pub data_path: PathBuf,
    /// Rendered chart artifact (CHART_FILE)
    pub chart_path: PathBuf,
    /// Server bind address (LISTEN_ADDR)
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_path = env::var("DATA_FILE")
            .unwrap_or_else(|_| "data.txt".to_string())
            .into();

        let chart_path = env::var("CHART_FILE")
            .unwrap_or_else(|_| "static/error.png".to_string())
            .into();

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .context("Failed to parse LISTEN_ADDR")?;

        Ok(Self {
            data_path,
            chart_path,
            listen_addr,
        })
    }
}
