//! Logging init for the server: stderr always, plus a log file under the
//! XDG state dir when one can be opened. A service run under systemd or in
//! a container gets its stderr collected anyway, so the file is a bonus,
//! not a requirement.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing. Never fails: if `~/.local/state/zipd/zipd.log`
/// cannot be opened, logs go to stderr only and the reason is logged there.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,zipd_core=debug,zipd_server=debug"));

    match open_state_log() {
        Ok((file, path)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr.and(Arc::new(file)))
                .with_ansi(false)
                .init();
            tracing::info!("logging to stderr and {}", path.display());
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!("log file unavailable ({err:#}), stderr only");
        }
    }
}

fn open_state_log() -> Result<(fs::File, PathBuf)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("zipd")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("create log dir {}", log_dir.display()))?;

    let path = log_dir.join("zipd.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok((file, path))
}
