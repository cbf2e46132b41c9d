//! Shared test doubles for exporter tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::{ExportConfig, FetchConfig, RetryConfig};
use crate::error::{DeliveryError, FetchError};
use crate::sink::{BlobHandle, DownloadSink};
use crate::types::{MediaDescriptor, MediaId, MediaKind};

use super::fetcher::ContentFetcher;

/// Config with a small batch size and near-zero retry delays
pub(crate) fn test_config() -> ExportConfig {
    ExportConfig {
        fetch: FetchConfig {
            batch_size: 2,
            ..FetchConfig::default()
        },
        retry: RetryConfig {
            max_attempts: 1,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 2.0,
            jitter: false,
        },
        ..ExportConfig::default()
    }
}

pub(crate) fn descriptor(id: &str, name: &str) -> MediaDescriptor {
    MediaDescriptor {
        id: MediaId::new(id),
        display_name: name.to_string(),
        content_url: format!("https://cdn.example.com/signed/{id}"),
        kind: MediaKind::Image,
        tags: vec![],
        created_at: None,
    }
}

/// Scripted outcome for one descriptor id
pub(crate) enum MockOutcome {
    Bytes(Vec<u8>),
    Status(u16),
}

/// In-memory fetcher driven by scripted per-id outcomes
///
/// Ids with no scripted outcome respond 404. Call counts let tests assert
/// that guards short-circuit before any fetching happens. A cancellation
/// token can be tripped when a given id is fetched, making between-chunk
/// cancellation deterministic to test.
#[derive(Default)]
pub(crate) struct MockFetcher {
    outcomes: HashMap<MediaId, MockOutcome>,
    cancel_on: Option<(MediaId, tokio_util::sync::CancellationToken)>,
    pub(crate) calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, id: &str, outcome: MockOutcome) -> Self {
        self.outcomes.insert(MediaId::new(id), outcome);
        self
    }

    pub(crate) fn cancel_when_fetching(
        mut self,
        id: &str,
        token: tokio_util::sync::CancellationToken,
    ) -> Self {
        self.cancel_on = Some((MediaId::new(id), token));
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(
        &self,
        descriptor: &MediaDescriptor,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((id, token)) = &self.cancel_on
            && id == &descriptor.id
        {
            token.cancel();
        }
        match self.outcomes.get(&descriptor.id) {
            Some(MockOutcome::Bytes(bytes)) => Ok(bytes.clone()),
            Some(MockOutcome::Status(status)) => Err(FetchError::Status { status: *status }),
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

/// Sink that records every stage/trigger/release and captures deliveries
pub(crate) struct RecordingSink {
    staged: Mutex<HashMap<u64, Vec<u8>>>,
    next_id: AtomicU64,
    pub(crate) stage_count: AtomicUsize,
    pub(crate) trigger_count: AtomicUsize,
    pub(crate) release_count: AtomicUsize,
    pub(crate) deliveries: Mutex<Vec<(String, Vec<u8>)>>,
    fail_trigger: bool,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::with_failing_trigger(false)
    }

    pub(crate) fn with_failing_trigger(fail_trigger: bool) -> Self {
        Self {
            staged: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            stage_count: AtomicUsize::new(0),
            trigger_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
            deliveries: Mutex::new(Vec::new()),
            fail_trigger,
        }
    }

    pub(crate) fn counts(&self) -> (usize, usize, usize) {
        (
            self.stage_count.load(Ordering::SeqCst),
            self.trigger_count.load(Ordering::SeqCst),
            self.release_count.load(Ordering::SeqCst),
        )
    }

    pub(crate) async fn staged_len(&self) -> usize {
        self.staged.lock().await.len()
    }
}

#[async_trait]
impl DownloadSink for RecordingSink {
    async fn stage(&self, bytes: Vec<u8>) -> std::result::Result<BlobHandle, DeliveryError> {
        self.stage_count.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.staged.lock().await.insert(id, bytes);
        Ok(BlobHandle::new(id))
    }

    async fn trigger(
        &self,
        handle: &BlobHandle,
        filename: &str,
    ) -> std::result::Result<(), DeliveryError> {
        self.trigger_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_trigger {
            return Err(DeliveryError::Io(std::io::Error::other("trigger failed")));
        }
        let bytes = {
            let staged = self.staged.lock().await;
            staged
                .get(&handle.id())
                .cloned()
                .ok_or(DeliveryError::HandleNotFound)?
        };
        self.deliveries
            .lock()
            .await
            .push((filename.to_string(), bytes));
        Ok(())
    }

    async fn release(&self, handle: BlobHandle) -> std::result::Result<(), DeliveryError> {
        self.release_count.fetch_add(1, Ordering::SeqCst);
        self.staged
            .lock()
            .await
            .remove(&handle.id())
            .ok_or(DeliveryError::HandleNotFound)?;
        Ok(())
    }
}
