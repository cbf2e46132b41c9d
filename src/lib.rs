//! # media-export
//!
//! Backend library for bulk media export: fetch a selection of remote
//! objects in bounded concurrent batches, bundle them into a compressed
//! archive with live progress reporting, and deliver the result through a
//! pluggable download sink. A simpler sibling pipeline renders structured
//! records to CSV through the same sink.
//!
//! ## Design Philosophy
//!
//! - **Best-effort bulk export** - Individual item failures are collected,
//!   not thrown; partial success is the expected common case
//! - **Explicit collaborators** - The HTTP fetcher and download sink are
//!   injected, never read from globals, so every piece tests in isolation
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to progress events, no polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use media_export::{ExportConfig, FsDownloadSink, HttpContentFetcher, MediaExporter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExportConfig::default();
//!     let fetcher = Arc::new(HttpContentFetcher::from_config(&config.fetch)?);
//!     let sink = Arc::new(FsDownloadSink::new("./exports"));
//!     let exporter = MediaExporter::new(config, fetcher, sink)?;
//!
//!     // Subscribe to events
//!     let mut events = exporter.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let targets = vec![/* MediaDescriptor list from your catalog service */];
//!     let summary = exporter.export_media(targets, "media").await?;
//!     println!("Bundled {} of {} items", summary.exported, summary.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// In-memory compressed archive building
pub mod archive;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Core exporter implementation (decomposed into focused submodules)
pub mod exporter;
/// Retry logic with exponential backoff
pub mod retry;
/// Selection state for bulk export
pub mod selection;
/// Download sinks (archive finalizer / download trigger)
pub mod sink;
/// Tabular (CSV) export
pub mod tabular;
/// Core types and events
pub mod types;
/// Utility functions for naming and filename templates
pub mod utils;

// Re-export commonly used types
pub use archive::ArchiveBuilder;
pub use config::{
    ArchiveConfig, EntryCollisionAction, ExportConfig, FetchConfig, NamingConfig, RetryConfig,
};
pub use error::{ArchiveError, DeliveryError, Error, FetchError, Result};
pub use exporter::{ContentFetcher, FetchedMedia, HttpContentFetcher, MediaExporter};
pub use selection::SelectionSet;
pub use sink::{BlobHandle, DownloadSink, FsDownloadSink, deliver};
pub use tabular::{Column, media_columns};
pub use types::{Event, ExportSummary, ItemFailure, MediaDescriptor, MediaId, MediaKind};
