//! Core types for media-export

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a media object, opaque and stable for the
/// lifetime of the underlying object in the remote catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub String);

impl MediaId {
    /// Create a new MediaId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Media kind discriminator
///
/// Unknown catalog values deserialize to [`MediaKind::Other`] so new types
/// added by the storage service do not break descriptor parsing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    Image,
    /// Video clip
    Video,
    /// Anything else (documents, overlays, unknown types)
    #[default]
    #[serde(other)]
    Other,
}

/// Metadata record describing a remote media object without its content.
///
/// Field names follow the catalog service's JSON wire format
/// (`id`, `name`, `url`, `type`, `tags`, `createdAt`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Opaque unique identifier, stable for the object's lifetime
    pub id: MediaId,

    /// Human-readable filename used as the archive entry name
    #[serde(rename = "name")]
    pub display_name: String,

    /// Time-limited signed URL resolving to the object's bytes.
    /// May expire mid-operation and must be treated as fallible.
    #[serde(rename = "url")]
    pub content_url: String,

    /// Media kind discriminator
    #[serde(rename = "type", default)]
    pub kind: MediaKind,

    /// Free-form tags attached by the catalog service
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp, when the catalog supplies one
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Parse a catalog service response body into descriptors.
///
/// The catalog returns a JSON array of descriptor records; anything else
/// is a serialization error.
pub fn catalog_from_json(body: &[u8]) -> crate::error::Result<Vec<MediaDescriptor>> {
    Ok(serde_json::from_slice(body)?)
}

/// A single item that failed during an export job, with the reason.
///
/// Failures are values, not exceptions: the job collects them and reports
/// the aggregate counts in the [`ExportSummary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Identifier of the failed item
    pub id: MediaId,
    /// Display name of the failed item
    pub display_name: String,
    /// Human-readable failure reason
    pub reason: String,
}

impl ItemFailure {
    /// Create a failure record for a descriptor
    pub fn new(descriptor: &MediaDescriptor, reason: impl Into<String>) -> Self {
        Self {
            id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a completed bulk export job.
///
/// `exported + failed.len() == total` always holds; partial success is a
/// success with the successful count, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Number of items the job attempted (snapshot size at job start)
    pub total: usize,
    /// Number of items fetched and bundled into the archive
    pub exported: usize,
    /// Items that failed, with reasons (visible detail for "X of Y succeeded")
    pub failed: Vec<ItemFailure>,
    /// Filename the archive was delivered under
    pub filename: String,
    /// Size of the sealed archive in bytes
    pub archive_bytes: u64,
}

/// Event emitted during an export job's lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Export job started
    Started {
        /// Number of items in the job snapshot
        total: usize,
    },

    /// An item settled (success or failure) and the percentage advanced.
    /// `percent` reaches exactly 100 when the last item settles, even if
    /// some items failed; 100 means "done attempting", not "100% succeeded".
    Progress {
        /// Items settled so far
        completed: usize,
        /// Total items in the job
        total: usize,
        /// floor(completed / total * 100), clamped to [0, 100]
        percent: u8,
    },

    /// A single item failed and was excluded from the archive
    ItemFailed {
        /// Identifier of the failed item
        id: MediaId,
        /// Human-readable failure reason
        reason: String,
    },

    /// Export job completed and the archive was delivered
    Completed {
        /// Number of items bundled into the archive
        exported: usize,
        /// Total items attempted
        total: usize,
        /// Delivered filename
        filename: String,
    },

    /// Export job failed as a whole; no file was produced
    Failed {
        /// Human-readable failure reason
        reason: String,
    },
}
