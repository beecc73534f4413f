//! Fetch-target URL validation.
//!
//! Restricts raw manifest strings to http/https resources. Legacy `ftp`
//! links (still present in older dataset records) are rewritten to `https`
//! before the scheme check.

use url::Url;

use crate::error::ArchiveError;

/// Parses and validates a raw manifest URL.
///
/// - `ftp://host/path` is rewritten to `https://host/path` (same authority,
///   path, and query).
/// - Only `http` and `https` pass; any other scheme or a parse failure is
///   rejected with the raw input preserved for diagnostics.
pub fn resolve_url(raw: &str) -> Result<Url, ArchiveError> {
    let reject = || ArchiveError::InvalidUrl(raw.to_string());

    let mut parsed = Url::parse(raw.trim()).map_err(|_| reject())?;

    if parsed.scheme() == "ftp" {
        // Url::set_scheme refuses some special-scheme transitions, so swap
        // the prefix textually and re-parse.
        let rewritten = format!("https{}", &parsed.as_str()["ftp".len()..]);
        parsed = Url::parse(&rewritten).map_err(|_| reject())?;
    }

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(reject()),
    }
}
