//! Request-scoped error taxonomy for the archive pipeline.
//!
//! Validation errors abort before any network activity; fetch errors abort
//! the whole batch (no partial archive is ever produced). The HTTP status
//! mapping lives in the server crate.

use std::fmt;

use thiserror::Error;

/// Why a single upstream fetch failed. Kept separate from [`ArchiveError`]
/// so status and transport failures can be distinguished in logs while
/// surfacing the same message to the caller.
#[derive(Debug)]
pub enum FetchFailure {
    /// Upstream responded with a non-2xx status.
    Status(u16),
    /// Connection, TLS, timeout, or body-read error.
    Transport(reqwest::Error),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Status(code) => write!(f, "HTTP {}", code),
            FetchFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FetchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchFailure::Status(_) => None,
            FetchFailure::Transport(e) => Some(e),
        }
    }
}

/// Error for one archive request. Every variant aborts the whole request.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Manifest had no files.
    #[error("No files provided")]
    EmptyManifest,

    /// Manifest exceeded the configured entry cap.
    #[error("Too many files: {count} (limit {limit})")]
    TooManyFiles { count: usize, limit: usize },

    /// URL failed to parse or used a scheme other than http/https.
    #[error("Unsupported or invalid URL: {0}")]
    InvalidUrl(String),

    /// A single payload exceeded the per-file byte cap.
    #[error("File exceeds size limit of {limit} bytes: {url}")]
    PayloadTooLarge { url: String, limit: u64 },

    /// The sum of fetched payloads exceeded the whole-archive byte cap.
    #[error("Manifest exceeds total size limit of {limit} bytes")]
    TotalTooLarge { limit: u64 },

    /// Upstream fetch failed (non-2xx status or transport error).
    #[error("Failed to fetch file: {url}")]
    Fetch {
        url: String,
        #[source]
        reason: FetchFailure,
    },

    /// ZIP encoding failed. Fatal, no partial output.
    #[error("archive encoding failed: {0}")]
    Encoding(#[from] zip::result::ZipError),

    /// A fetch worker task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl ArchiveError {
    /// True for errors caused by the caller's manifest (rejected before or
    /// instead of upstream work), false for upstream/internal failures.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ArchiveError::EmptyManifest
                | ArchiveError::TooManyFiles { .. }
                | ArchiveError::InvalidUrl(_)
                | ArchiveError::PayloadTooLarge { .. }
                | ArchiveError::TotalTooLarge { .. }
        )
    }
}
