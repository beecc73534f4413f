//! Manifest model and first-pass resolution.
//!
//! A manifest is the caller-supplied list of remote files plus the desired
//! archive name. Resolution validates every URL and fixes every entry name
//! before any fetch starts, so a bad entry never costs network traffic.

mod dedupe;
mod sanitize;

pub use dedupe::NameAllocator;
pub use sanitize::{sanitize_name, FALLBACK_NAME};

use serde::Deserialize;
use url::Url;

use crate::config::ZipdConfig;
use crate::error::ArchiveError;
use crate::urls::resolve_url;

/// One requested file: where to fetch it and (optionally) what to call it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Caller-supplied archive request (POST body).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    #[serde(default)]
    pub archive_name: Option<String>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// One validated, named entry. Order matches the input manifest.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    pub url: Url,
    pub final_name: String,
}

/// Fully validated manifest, ready for the fetch phase.
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    /// Sanitized archive filename, always ending in `.zip`.
    pub archive_name: String,
    pub entries: Vec<ResolvedEntry>,
}

/// Validates the whole manifest as a first pass.
///
/// Rejects empty or oversized manifests and any invalid URL before a single
/// fetch is issued. Entry names are derived (explicit filename, else last URL
/// path segment, else the fallback token), sanitized, and de-duplicated in
/// input order so the first holder of a name keeps it unsuffixed.
pub fn resolve(
    request: &ArchiveRequest,
    cfg: &ZipdConfig,
) -> Result<ResolvedManifest, ArchiveError> {
    if request.files.is_empty() {
        return Err(ArchiveError::EmptyManifest);
    }
    if request.files.len() > cfg.max_files {
        return Err(ArchiveError::TooManyFiles {
            count: request.files.len(),
            limit: cfg.max_files,
        });
    }

    let archive_name =
        resolve_archive_name(request.archive_name.as_deref(), &cfg.default_archive_name);

    let mut names = NameAllocator::new();
    let mut entries = Vec::with_capacity(request.files.len());
    for file in &request.files {
        let url = resolve_url(&file.url)?;
        let requested = file
            .filename
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .or_else(|| filename_from_url_path(&url))
            .unwrap_or_else(|| FALLBACK_NAME.to_string());
        let final_name = names.allocate(&sanitize_name(&requested));
        entries.push(ResolvedEntry { url, final_name });
    }

    Ok(ResolvedManifest {
        archive_name,
        entries,
    })
}

/// Sanitizes the requested archive name (or falls back to the configured
/// default) and enforces the `.zip` suffix.
fn resolve_archive_name(requested: Option<&str>, default: &str) -> String {
    let name = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(requested) => sanitize_name(requested),
        None => return default.to_string(),
    };
    if name.to_ascii_lowercase().ends_with(".zip") {
        name
    } else {
        format!("{name}.zip")
    }
}

/// Last non-empty path segment of a URL, used as the entry name hint when the
/// manifest gives none.
fn filename_from_url_path(url: &Url) -> Option<String> {
    let segment = url.path().split('/').filter(|s| !s.is_empty()).next_back()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
