// File: src/logging.rs
use crate::paths::AppPaths;
use anyhow::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Route tracing output to a file; the terminal belongs to the TUI.
/// `RUST_LOG` wins over the configured level.
pub fn init(level: &str) -> Result<()> {
    let path = AppPaths::get_log_path()?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not install logger: {}", e))?;

    tracing::info!(log = %path.display(), "logging started");
    Ok(())
}
