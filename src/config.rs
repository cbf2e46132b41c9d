//! Configuration types for media-export

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Fetch behavior configuration (batching, timeouts)
///
/// Groups settings for how selected items are retrieved from the storage
/// service. Used as a nested sub-config within [`ExportConfig`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of in-flight fetches per chunk (default: 5)
    ///
    /// Targets are partitioned into consecutive chunks of this size. All
    /// fetches within a chunk run concurrently; the next chunk does not
    /// start until every fetch in the current one has settled.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Retry behavior for transient per-item fetch failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts per item (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 500 ms)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 5 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// How archive entry name collisions are handled
///
/// Two selected items may share a display name. Last-write-wins overwrite
/// silently loses data, so renaming is the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCollisionAction {
    /// Suffix colliding names with " (1)", " (2)", ... before the extension
    #[default]
    Rename,
    /// Keep last-write-wins overwrite
    Overwrite,
}

/// Archive building configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// DEFLATE compression level, 0-9 (default: 6)
    ///
    /// Applied uniformly to every entry; not configurable per item.
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,

    /// Entry name collision handling (default: rename)
    #[serde(default)]
    pub entry_collision: EntryCollisionAction,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            entry_collision: EntryCollisionAction::default(),
        }
    }
}

/// Download filename configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix for delivered filenames (default: "export")
    ///
    /// Archives are named `{prefix}-{topic}-{YYYY-MM-DD}.zip`, tables
    /// `{prefix}-{topic}-{YYYY-MM-DDTHH-MM-SS}.csv`.
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
        }
    }
}

/// Main configuration for [`MediaExporter`](crate::exporter::MediaExporter)
///
/// Fields are organized into logical sub-configs:
/// - [`fetch`](FetchConfig) - batching and timeouts
/// - [`retry`](RetryConfig) - transient-failure retry policy
/// - [`archive`](ArchiveConfig) - compression and collision handling
/// - [`naming`](NamingConfig) - delivered filename templates
///
/// All sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Fetch behavior (batching, timeouts)
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// Retry policy for transient fetch failures
    #[serde(flatten)]
    pub retry: RetryConfig,

    /// Archive building settings
    #[serde(flatten)]
    pub archive: ArchiveConfig,

    /// Delivered filename settings
    #[serde(flatten)]
    pub naming: NamingConfig,
}

impl ExportConfig {
    /// Validate the configuration, naming the offending key on failure
    pub fn validate(&self) -> Result<()> {
        if self.fetch.batch_size == 0 {
            return Err(Error::Config {
                message: "batch_size must be at least 1".to_string(),
                key: Some("batch_size".to_string()),
            });
        }
        if !(0..=9).contains(&self.archive.compression_level) {
            return Err(Error::Config {
                message: format!(
                    "compression_level must be between 0 and 9, got {}",
                    self.archive.compression_level
                ),
                key: Some("compression_level".to_string()),
            });
        }
        Ok(())
    }
}

fn default_batch_size() -> usize {
    5
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_compression_level() -> i32 {
    6
}

fn default_filename_prefix() -> String {
    "export".to_string()
}

fn default_true() -> bool {
    true
}

/// Serialize Duration as milliseconds for config files
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
