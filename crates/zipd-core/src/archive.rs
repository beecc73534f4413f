//! In-memory ZIP assembly.

use std::io::{Cursor, Write};

use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;
use crate::fetcher::FetchedFile;

/// Builds a single ZIP archive from fetched payloads, in the given order.
///
/// Entries are deflate-compressed at `compression_level` (0-9; 6 is the
/// default, a reasonable trade-off for scientific formats that are often
/// already compressed). Any encoding error is fatal; no partial archive is
/// returned.
pub fn build_archive(
    entries: &[FetchedFile],
    compression_level: u32,
) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(compression_level.min(9))));

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.body).map_err(ZipError::Io)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
