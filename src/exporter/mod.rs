//! Bulk media exporter split into focused submodules.
//!
//! The `MediaExporter` struct and its operations are organized by concern:
//! - [`fetcher`] - Resolving signed URLs to content bytes
//! - [`batching`] - Chunk partitioning and concurrent chunk fetching
//! - [`progress`] - Settled-item counting and progress events
//! - [`finalization`] - Archive sealing and sink delivery

mod batching;
mod fetcher;
mod finalization;
mod progress;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use fetcher::{ContentFetcher, FetchedMedia, HttpContentFetcher};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::archive::ArchiveBuilder;
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::sink::{DownloadSink, deliver};
use crate::tabular::{Column, render};
use crate::types::{Event, ExportSummary, ItemFailure, MediaDescriptor};
use crate::utils::{archive_filename, table_filename};

use batching::{chunk_targets, fetch_chunk, insert_chunk};
use finalization::seal_and_deliver;
use progress::ProgressTracker;

/// Buffered events per subscriber before the oldest are dropped
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Bulk media exporter (cloneable - all fields are Arc-wrapped)
///
/// Owns the export configuration and the injected collaborators: a
/// [`ContentFetcher`] resolving descriptors to bytes and a [`DownloadSink`]
/// receiving finished files. Consumers subscribe to [`Event`]s to observe
/// running jobs; no polling is required.
#[derive(Clone)]
pub struct MediaExporter {
    /// Configuration (wrapped in Arc for sharing across tasks)
    config: Arc<ExportConfig>,
    /// Content fetcher resolving signed URLs (trait object for pluggable implementations)
    fetcher: Arc<dyn ContentFetcher>,
    /// Download sink receiving delivered files
    sink: Arc<dyn DownloadSink>,
    /// Event broadcast channel sender (multiple subscribers supported)
    event_tx: broadcast::Sender<Event>,
}

impl MediaExporter {
    /// Create an exporter with explicit collaborators
    ///
    /// Fails fast on invalid configuration.
    pub fn new(
        config: ExportConfig,
        fetcher: Arc<dyn ContentFetcher>,
        sink: Arc<dyn DownloadSink>,
    ) -> Result<Self> {
        config.validate()?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            sink,
            event_tx,
        })
    }

    /// Subscribe to export lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Export the given targets into a compressed archive
    ///
    /// Best-effort bulk export: items that fail to fetch are excluded and
    /// the job continues; partial success is a success with the successful
    /// count in the returned [`ExportSummary`]. The targets are the job's
    /// immutable snapshot, typically produced by
    /// [`SelectionSet::snapshot`](crate::selection::SelectionSet::snapshot).
    pub async fn export_media(
        &self,
        targets: Vec<MediaDescriptor>,
        topic: &str,
    ) -> Result<ExportSummary> {
        self.export_media_with_cancel(targets, topic, CancellationToken::new())
            .await
    }

    /// Export with an explicit cancellation token
    ///
    /// The token is checked before each chunk; cancelling stops the job with
    /// [`Error::Cancelled`] once the in-flight chunk settles, and no further
    /// network requests are issued.
    pub async fn export_media_with_cancel(
        &self,
        targets: Vec<MediaDescriptor>,
        topic: &str,
        cancel: CancellationToken,
    ) -> Result<ExportSummary> {
        // Empty-input guard: surfaced before any events or network activity
        if targets.is_empty() {
            return Err(Error::NothingToExport);
        }

        self.event_tx
            .send(Event::Started {
                total: targets.len(),
            })
            .ok();

        let result = self.run_export(targets, topic, &cancel).await;
        if let Err(e) = &result {
            self.event_tx
                .send(Event::Failed {
                    reason: e.to_string(),
                })
                .ok();
        }
        result
    }

    async fn run_export(
        &self,
        targets: Vec<MediaDescriptor>,
        topic: &str,
        cancel: &CancellationToken,
    ) -> Result<ExportSummary> {
        let total = targets.len();
        let progress = ProgressTracker::new(total, self.event_tx.clone());
        let mut builder = ArchiveBuilder::new(&self.config.archive);
        let mut failures: Vec<ItemFailure> = Vec::new();

        info!(total, topic, "Starting bulk media export");

        for chunk in chunk_targets(targets, self.config.fetch.batch_size) {
            if cancel.is_cancelled() {
                info!(
                    settled = progress.completed(),
                    total, "Export cancelled between chunks"
                );
                return Err(Error::Cancelled);
            }

            let outcome = fetch_chunk(
                chunk,
                self.fetcher.as_ref(),
                &self.config.retry,
                &progress,
                &self.event_tx,
            )
            .await;
            failures.extend(outcome.failures);

            let (returned, insert_failures) = insert_chunk(builder, outcome.fetched).await?;
            builder = returned;
            for failure in &insert_failures {
                self.event_tx
                    .send(Event::ItemFailed {
                        id: failure.id.clone(),
                        reason: failure.reason.clone(),
                    })
                    .ok();
            }
            failures.extend(insert_failures);
        }

        // Whole-job failure: nothing made it in, so no file is produced
        if builder.is_empty() {
            return Err(Error::ExportFailed { attempted: total });
        }

        let exported = builder.len();
        let filename = archive_filename(&self.config.naming.filename_prefix, topic, Utc::now());
        let archive_bytes = seal_and_deliver(builder, self.sink.as_ref(), &filename).await?;

        info!(exported, total, filename = %filename, "Bulk media export complete");
        self.event_tx
            .send(Event::Completed {
                exported,
                total,
                filename: filename.clone(),
            })
            .ok();

        Ok(ExportSummary {
            total,
            exported,
            failed: failures,
            filename,
            archive_bytes,
        })
    }

    /// Render records to CSV and deliver the file through the sink
    ///
    /// Mirrors the archive path's empty-input policy: zero rows short-circuit
    /// with [`Error::NothingToExport`] instead of producing a header-only
    /// file. Returns the delivered filename.
    pub async fn export_table<R>(
        &self,
        rows: &[R],
        columns: &[Column<R>],
        topic: &str,
    ) -> Result<String> {
        if rows.is_empty() {
            return Err(Error::NothingToExport);
        }

        let output = render(rows, columns);
        let filename = table_filename(&self.config.naming.filename_prefix, topic, Utc::now());
        deliver(self.sink.as_ref(), output.into_bytes(), &filename).await?;

        info!(rows = rows.len(), filename = %filename, "Table export complete");
        Ok(filename)
    }
}
