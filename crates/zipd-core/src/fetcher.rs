//! Bounded, order-preserving fetch of all manifest entries.
//!
//! A fixed-size worker pool: up to `max_parallel` fetches are in flight at
//! once on a `JoinSet`, and a new one is started whenever a slot frees up.
//! Results are written into index-addressed slots so the output order always
//! equals the manifest order, no matter which fetch finishes first. The
//! first failure of any kind aborts the whole operation; no partial result
//! is ever returned.

use bytes::{Bytes, BytesMut};
use reqwest::header;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

use crate::error::{ArchiveError, FetchFailure};
use crate::manifest::ResolvedEntry;

/// One fetched payload, carrying its resolved archive entry name.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub name: String,
    pub body: Bytes,
}

/// Byte caps enforced while buffering payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchLimits {
    pub max_file_bytes: Option<u64>,
    pub max_total_bytes: Option<u64>,
}

/// Fetches every entry with at most `max_parallel` in flight, preserving
/// manifest order in the returned sequence.
///
/// All-or-nothing: a non-2xx status, a transport error, or a byte-cap
/// violation on any entry fails the whole call and aborts the outstanding
/// fetches.
pub async fn fetch_all(
    client: &reqwest::Client,
    entries: &[ResolvedEntry],
    max_parallel: usize,
    limits: FetchLimits,
) -> Result<Vec<FetchedFile>, ArchiveError> {
    let max_parallel = max_parallel.max(1);
    let mut slots: Vec<Option<FetchedFile>> = entries.iter().map(|_| None).collect();
    let mut queue = entries.iter().enumerate();
    let mut join_set = JoinSet::new();
    // Shared running total across concurrent fetches, advanced per chunk so
    // the cap trips mid-stream, not after a payload has fully buffered.
    let total_bytes = Arc::new(AtomicU64::new(0));

    loop {
        while join_set.len() < max_parallel {
            let Some((slot, entry)) = queue.next() else {
                break;
            };
            let client = client.clone();
            let url = entry.url.clone();
            let name = entry.final_name.clone();
            let total_bytes = Arc::clone(&total_bytes);
            join_set.spawn(async move {
                let body = fetch_one(&client, &url, limits, &total_bytes).await?;
                Ok::<_, ArchiveError>((slot, FetchedFile { name, body }))
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined.map_err(|e| ArchiveError::Task(e.to_string()))? {
            Ok((slot, fetched)) => slots[slot] = Some(fetched),
            Err(e) => {
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    // Every slot is filled once the pool drained without error.
    slots
        .into_iter()
        .map(|fetched| {
            fetched.ok_or_else(|| {
                ArchiveError::Task("fetch worker exited without a result".to_string())
            })
        })
        .collect()
}

/// Fetches one URL and buffers the body chunk by chunk, checking the byte
/// caps as the stream arrives.
///
/// Caching is disabled so every archive build sees fresh bytes. A non-2xx
/// status and a transport error surface identically as `Fetch`.
async fn fetch_one(
    client: &reqwest::Client,
    url: &Url,
    limits: FetchLimits,
    total_bytes: &AtomicU64,
) -> Result<Bytes, ArchiveError> {
    let fetch_err = |reason| ArchiveError::Fetch {
        url: url.to_string(),
        reason,
    };
    let too_large = |limit| ArchiveError::PayloadTooLarge {
        url: url.to_string(),
        limit,
    };

    let mut response = client
        .get(url.clone())
        .header(header::CACHE_CONTROL, "no-store")
        .send()
        .await
        .map_err(|e| fetch_err(FetchFailure::Transport(e)))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "upstream fetch failed");
        return Err(fetch_err(FetchFailure::Status(status.as_u16())));
    }

    // Reject on the advertised length first so an oversized body is not
    // buffered at all when the upstream is honest about it. Chunked bodies
    // carry no length and are caught by the streaming checks below.
    if let (Some(limit), Some(len)) = (limits.max_file_bytes, response.content_length()) {
        if len > limit {
            return Err(too_large(limit));
        }
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| fetch_err(FetchFailure::Transport(e)))?
    {
        let running_total =
            total_bytes.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        if let Some(limit) = limits.max_total_bytes {
            if running_total > limit {
                return Err(ArchiveError::TotalTooLarge { limit });
            }
        }

        body.extend_from_slice(&chunk);
        if let Some(limit) = limits.max_file_bytes {
            if body.len() as u64 > limit {
                return Err(too_large(limit));
            }
        }
    }

    tracing::debug!(%url, bytes = body.len(), "fetched");
    Ok(body.freeze())
}
