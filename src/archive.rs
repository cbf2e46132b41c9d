//! In-memory compressed archive building
//!
//! Fetched media blobs are inserted incrementally into a zip archive held in
//! memory, then sealed into a single byte buffer for delivery. Compression is
//! DEFLATE at one fixed level for every entry.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use tracing::debug;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

use crate::config::{ArchiveConfig, EntryCollisionAction};
use crate::error::ArchiveError;
use crate::utils::{sanitize_entry_name, unique_name};

/// Incremental builder for the export archive
///
/// Entry insertion and sealing are CPU-bound; the exporter runs both on a
/// blocking thread so runtime workers stay free for network I/O.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    collision: EntryCollisionAction,
    entry_names: HashSet<String>,
    entries: usize,
}

impl ArchiveBuilder {
    /// Create an empty archive with the configured compression level
    pub fn new(config: &ArchiveConfig) -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(config.compression_level));

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            collision: config.entry_collision,
            entry_names: HashSet::new(),
            entries: 0,
        }
    }

    /// Add an entry under the given display name
    ///
    /// The name is sanitized to a flat, path-safe entry name first. Name
    /// collisions follow the configured policy: rename suffixes " (1)",
    /// " (2)", ... before the extension; overwrite keeps last-write-wins.
    ///
    /// A rejected entry leaves the rest of the archive usable; the caller
    /// records it as a per-item failure and continues.
    ///
    /// Returns the final entry name actually used.
    pub fn insert(&mut self, display_name: &str, data: &[u8]) -> Result<String, ArchiveError> {
        let sanitized = sanitize_entry_name(display_name);
        let entry_name = match self.collision {
            EntryCollisionAction::Rename => unique_name(&sanitized, &self.entry_names),
            EntryCollisionAction::Overwrite => sanitized,
        };

        self.writer
            .start_file(entry_name.clone(), self.options)
            .map_err(|e| ArchiveError::EntryRejected {
                name: entry_name.clone(),
                reason: e.to_string(),
            })?;
        self.writer
            .write_all(data)
            .map_err(|e| ArchiveError::EntryRejected {
                name: entry_name.clone(),
                reason: e.to_string(),
            })?;

        debug!(entry = %entry_name, size = data.len(), "Inserted archive entry");
        self.entry_names.insert(entry_name.clone());
        self.entries += 1;
        Ok(entry_name)
    }

    /// Number of entries inserted so far
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Serialize the archive into its final byte form
    ///
    /// CPU-bound for large inputs; run inside `spawn_blocking`.
    pub fn seal(mut self) -> Result<Vec<u8>, ArchiveError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| ArchiveError::SealFailed(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}
