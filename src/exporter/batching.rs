//! Chunked fetching: partitioning targets and running one chunk's fetches
//! concurrently while the archive grows on a blocking thread.

use futures::future::join_all;
use tokio::sync::broadcast;
use tracing::warn;

use crate::archive::ArchiveBuilder;
use crate::config::RetryConfig;
use crate::error::{Error, Result};
use crate::retry::fetch_with_retry;
use crate::types::{Event, ItemFailure, MediaDescriptor};

use super::fetcher::{ContentFetcher, FetchedMedia};
use super::progress::ProgressTracker;

/// Partition targets into consecutive chunks of at most `batch_size`
///
/// Produces ceil(N / batch_size) chunks whose concatenation reproduces the
/// targets exactly once each, in order. Chunks are processed strictly in
/// sequence; concurrency only exists within a chunk.
pub(super) fn chunk_targets(
    targets: Vec<MediaDescriptor>,
    batch_size: usize,
) -> Vec<Vec<MediaDescriptor>> {
    let size = batch_size.max(1);
    targets.chunks(size).map(|chunk| chunk.to_vec()).collect()
}

/// One chunk's settled results
pub(super) struct ChunkOutcome {
    /// Items fetched successfully, in chunk order
    pub(super) fetched: Vec<FetchedMedia>,
    /// Items that failed after retries, with reasons
    pub(super) failures: Vec<ItemFailure>,
}

/// Fetch every member of a chunk concurrently and await them all
///
/// Per-item failures are logged, emitted as [`Event::ItemFailed`], and
/// collected; they never abort the chunk or the job. All futures are driven
/// on the calling task, so progress updates settle sequentially.
pub(super) async fn fetch_chunk(
    chunk: Vec<MediaDescriptor>,
    fetcher: &dyn ContentFetcher,
    retry: &RetryConfig,
    progress: &ProgressTracker,
    event_tx: &broadcast::Sender<Event>,
) -> ChunkOutcome {
    let fetches = chunk.into_iter().map(|descriptor| async move {
        let result = fetch_with_retry(retry, || fetcher.fetch(&descriptor)).await;
        progress.item_settled();
        match result {
            Ok(bytes) => Ok(FetchedMedia { descriptor, bytes }),
            Err(e) => {
                warn!(media_id = %descriptor.id, error = %e, "Fetch failed, excluding item");
                event_tx
                    .send(Event::ItemFailed {
                        id: descriptor.id.clone(),
                        reason: e.to_string(),
                    })
                    .ok();
                Err(ItemFailure::new(&descriptor, e.to_string()))
            }
        }
    });

    let mut outcome = ChunkOutcome {
        fetched: Vec::new(),
        failures: Vec::new(),
    };
    for result in join_all(fetches).await {
        match result {
            Ok(item) => outcome.fetched.push(item),
            Err(failure) => outcome.failures.push(failure),
        }
    }
    outcome
}

/// Insert a chunk's fetched payloads into the archive on a blocking thread
///
/// Compression is CPU-bound; offloading it keeps runtime workers free to
/// drive the next chunk's network I/O. The builder is moved in and handed
/// back. A rejected entry is recorded as a per-item failure and skipped.
pub(super) async fn insert_chunk(
    mut builder: ArchiveBuilder,
    fetched: Vec<FetchedMedia>,
) -> Result<(ArchiveBuilder, Vec<ItemFailure>)> {
    let handle = tokio::task::spawn_blocking(move || {
        let mut failures = Vec::new();
        for item in fetched {
            if let Err(e) = builder.insert(&item.descriptor.display_name, &item.bytes) {
                warn!(media_id = %item.descriptor.id, error = %e, "Archive rejected entry, excluding item");
                failures.push(ItemFailure::new(&item.descriptor, e.to_string()));
            }
        }
        (builder, failures)
    });

    handle
        .await
        .map_err(|e| Error::Other(format!("archive insert task panicked: {e}")))
}
