//! Download sinks: delivering a finished blob to the host environment
//!
//! The host's "present this blob to the user as a file save" capability is
//! modelled as a scoped resource: a blob is staged, a save is triggered
//! exactly once against the staged handle, and the handle is released on all
//! paths. Leaking staged blobs accumulates memory across repeated exports.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::DeliveryError;
use crate::utils::get_unique_path;

/// Opaque handle to a staged blob
///
/// Deliberately not `Clone`: [`DownloadSink::release`] consumes the handle,
/// so the type system rules out double release.
#[derive(Debug)]
pub struct BlobHandle(u64);

impl BlobHandle {
    /// Create a handle from a sink-assigned id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The sink-assigned id
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A host "save file" capability
///
/// The exporter treats this as an opaque sink: stage bytes, trigger a save
/// under a filename, release the staged reference. Implementations decide
/// what "save" means (write to a directory, hand off to a UI shell, record
/// for assertions in tests).
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Stage a blob, returning a handle for a single later trigger
    async fn stage(&self, bytes: Vec<u8>) -> Result<BlobHandle, DeliveryError>;

    /// Trigger the save-as interaction for a staged blob
    async fn trigger(&self, handle: &BlobHandle, filename: &str) -> Result<(), DeliveryError>;

    /// Release the staged blob's resources
    async fn release(&self, handle: BlobHandle) -> Result<(), DeliveryError>;
}

/// Stage, trigger once, and release a blob; release runs on the error path too
///
/// A trigger failure still releases the handle; the trigger error is the one
/// reported.
pub async fn deliver(
    sink: &dyn DownloadSink,
    bytes: Vec<u8>,
    filename: &str,
) -> Result<(), DeliveryError> {
    let handle = sink.stage(bytes).await?;
    let triggered = sink.trigger(&handle, filename).await;
    let released = sink.release(handle).await;
    triggered?;
    released
}

/// Filesystem download sink
///
/// Staged blobs are held in an in-memory registry; `trigger` writes the blob
/// into the output directory (resolving filename collisions by suffixing),
/// and `release` drops the registry entry.
pub struct FsDownloadSink {
    output_dir: PathBuf,
    staged: Mutex<HashMap<u64, Vec<u8>>>,
    next_id: AtomicU64,
}

impl FsDownloadSink {
    /// Create a sink that saves files under `output_dir`
    ///
    /// The directory is created on first trigger if it does not exist.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            staged: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of currently staged blobs (zero when nothing has leaked)
    pub async fn staged_len(&self) -> usize {
        self.staged.lock().await.len()
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn stage(&self, bytes: Vec<u8>) -> Result<BlobHandle, DeliveryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(handle = id, size = bytes.len(), "Staged blob");
        self.staged.lock().await.insert(id, bytes);
        Ok(BlobHandle(id))
    }

    async fn trigger(&self, handle: &BlobHandle, filename: &str) -> Result<(), DeliveryError> {
        let bytes = {
            let staged = self.staged.lock().await;
            staged
                .get(&handle.id())
                .cloned()
                .ok_or(DeliveryError::HandleNotFound)?
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = get_unique_path(&self.output_dir.join(filename));
        tokio::fs::write(&path, bytes).await?;

        info!(path = %path.display(), "Saved export");
        Ok(())
    }

    async fn release(&self, handle: BlobHandle) -> Result<(), DeliveryError> {
        let removed = self.staged.lock().await.remove(&handle.id());
        if removed.is_none() {
            return Err(DeliveryError::HandleNotFound);
        }
        debug!(handle = handle.id(), "Released staged blob");
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn deliver_saves_and_releases() {
        tokio_test::block_on(async {
            let temp_dir = TempDir::new().unwrap();
            let sink = FsDownloadSink::new(temp_dir.path());

            deliver(&sink, b"archive bytes".to_vec(), "export-media-2026-08-06.zip")
                .await
                .unwrap();

            let saved = std::fs::read(temp_dir.path().join("export-media-2026-08-06.zip")).unwrap();
            assert_eq!(saved, b"archive bytes");
            assert_eq!(sink.staged_len().await, 0, "staged registry must drain");
        });
    }

    #[test]
    fn repeated_delivery_suffixes_existing_files() {
        tokio_test::block_on(async {
            let temp_dir = TempDir::new().unwrap();
            let sink = FsDownloadSink::new(temp_dir.path());

            deliver(&sink, b"first".to_vec(), "export.zip").await.unwrap();
            deliver(&sink, b"second".to_vec(), "export.zip").await.unwrap();

            assert_eq!(
                std::fs::read(temp_dir.path().join("export.zip")).unwrap(),
                b"first"
            );
            assert_eq!(
                std::fs::read(temp_dir.path().join("export (1).zip")).unwrap(),
                b"second"
            );
        });
    }

    #[test]
    fn trigger_on_released_handle_fails() {
        tokio_test::block_on(async {
            let temp_dir = TempDir::new().unwrap();
            let sink = FsDownloadSink::new(temp_dir.path());

            let handle = sink.stage(b"bytes".to_vec()).await.unwrap();
            let id = handle.id();
            sink.release(handle).await.unwrap();

            let stale = BlobHandle::new(id);
            let result = sink.trigger(&stale, "export.zip").await;
            assert!(matches!(result, Err(DeliveryError::HandleNotFound)));
        });
    }

    #[test]
    fn release_runs_even_when_trigger_fails() {
        tokio_test::block_on(async {
            let temp_dir = TempDir::new().unwrap();
            // A file standing where the output directory should be makes
            // create_dir_all (and thus trigger) fail.
            let blocked = temp_dir.path().join("blocked");
            std::fs::write(&blocked, "not a directory").unwrap();
            let sink = FsDownloadSink::new(&blocked);

            let result = deliver(&sink, b"bytes".to_vec(), "export.zip").await;
            assert!(result.is_err());
            assert_eq!(sink.staged_len().await, 0, "failed delivery must still release");
        });
    }
}
