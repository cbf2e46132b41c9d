//! Sealing the archive and delivering it through the download sink.

use tracing::debug;

use crate::archive::ArchiveBuilder;
use crate::error::{Error, Result};
use crate::sink::{DownloadSink, deliver};

/// Seal the archive on a blocking thread and deliver it under `filename`
///
/// Returns the sealed archive's size in bytes. Sealing is CPU-bound for
/// large batches and must not stall the runtime's workers.
pub(super) async fn seal_and_deliver(
    builder: ArchiveBuilder,
    sink: &dyn DownloadSink,
    filename: &str,
) -> Result<u64> {
    let entries = builder.len();
    let bytes = tokio::task::spawn_blocking(move || builder.seal())
        .await
        .map_err(|e| Error::Other(format!("archive seal task panicked: {e}")))??;

    let archive_bytes = bytes.len() as u64;
    debug!(entries, archive_bytes, filename, "Sealed archive");

    deliver(sink, bytes, filename).await?;
    Ok(archive_bytes)
}
