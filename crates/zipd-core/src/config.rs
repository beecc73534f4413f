use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_archive_name() -> String {
    "download.zip".to_string()
}

/// Global configuration loaded from `~/.config/zipd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZipdConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum concurrent upstream fetches within one archive request.
    pub max_parallel: usize,
    /// Overall per-fetch timeout in seconds (connect + body).
    pub fetch_timeout_secs: u64,
    /// Connect timeout in seconds for each upstream fetch.
    pub connect_timeout_secs: u64,
    /// Maximum number of files in one manifest; larger manifests are rejected
    /// before any fetch starts.
    pub max_files: usize,
    /// Optional per-file payload cap in bytes (None = no cap).
    #[serde(default)]
    pub max_file_bytes: Option<u64>,
    /// Optional cap on the sum of all fetched payloads in bytes (None = no cap).
    #[serde(default)]
    pub max_total_bytes: Option<u64>,
    /// Deflate compression level (0-9) for archive entries.
    pub compression_level: u32,
    /// Archive filename used when the manifest does not name one.
    #[serde(default = "default_archive_name")]
    pub default_archive_name: String,
}

impl Default for ZipdConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_parallel: 6,
            fetch_timeout_secs: 60,
            connect_timeout_secs: 10,
            max_files: 256,
            max_file_bytes: Some(512 * 1024 * 1024),
            max_total_bytes: Some(2 * 1024 * 1024 * 1024),
            compression_level: 6,
            default_archive_name: default_archive_name(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("zipd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ZipdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ZipdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path. Unlike [`load_or_init`], a
/// missing file is an error rather than a reason to create one.
pub fn load_from(path: &Path) -> Result<ZipdConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: ZipdConfig = toml::from_str(&data)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
