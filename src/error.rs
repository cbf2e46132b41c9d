//! Error types for media-export
//!
//! This module provides the error handling surface for the library:
//! - A top-level [`Error`] for job-level failures (the only errors callers see)
//! - Domain-specific sub-errors ([`FetchError`], [`ArchiveError`], [`DeliveryError`])
//!
//! Per-item failures never surface as errors. They are collected into the job's
//! [`ItemFailure`](crate::types::ItemFailure) list so the aggregate success and
//! failure counts are first-class, testable values.

use thiserror::Error;

/// Result type alias for media-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-export
///
/// Only job-level failures are represented here. Individual item failures
/// (an expired signed URL, a rejected archive entry) are recovered locally
/// and reported through the export summary instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "batch_size")
        key: Option<String>,
    },

    /// Nothing selected or available to export; no network activity occurred
    #[error("nothing to export")]
    NothingToExport,

    /// Every item in the job failed; no archive was produced
    #[error("no files to export: all {attempted} items failed")]
    ExportFailed {
        /// Number of items the job attempted to fetch
        attempted: usize,
    },

    /// Export cancelled between chunks via the cancellation token
    #[error("export cancelled")]
    Cancelled,

    /// Archive serialization error
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Download sink delivery error
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Network error (HTTP client construction, not per-item fetches)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Per-item content fetch errors
///
/// These never propagate out of an export job. They are retried when
/// transient, then recorded as item failures in the job summary.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Content URL failed to parse
    #[error("invalid content URL: {0}")]
    InvalidUrl(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, reset, DNS, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status; expired signed URLs typically surface as 400/403
    #[error("HTTP status {status}")]
    Status {
        /// The HTTP status code returned by the storage service
        status: u16,
    },
}

/// Archive building errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A single entry could not be added; the archive itself remains usable
    #[error("archive entry {name} rejected: {reason}")]
    EntryRejected {
        /// Entry name that was rejected
        name: String,
        /// Reason the archive library rejected the entry
        reason: String,
    },

    /// The archive could not be serialized to its final byte form
    #[error("failed to serialize archive: {0}")]
    SealFailed(String),
}

/// Download sink delivery errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Handle does not refer to a currently staged blob
    #[error("staged blob not found")]
    HandleNotFound,

    /// I/O error writing the delivered file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
