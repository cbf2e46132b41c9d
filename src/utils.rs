//! Utility functions for entry naming and filename templates

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Maximum number of rename attempts when resolving name collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Sanitize a display name into a flat, path-safe archive entry name
///
/// Takes the final path segment (display names coming from the catalog may
/// contain separators), strips control characters, and falls back to
/// `"file"` when nothing usable remains.
pub fn sanitize_entry_name(display_name: &str) -> String {
    let last_segment = display_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(display_name);

    let cleaned: String = last_segment
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Find a unique name among `taken`, suffixing " (1)", " (2)", ... before
/// the extension when `name` collides.
///
/// Returns `name` unchanged when it is not taken. If every suffixed variant
/// up to the attempt cap is taken, returns the last candidate anyway (the
/// archive then overwrites, which is the degenerate-case behavior).
pub fn unique_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    let extension = path.extension().and_then(|e| e.to_str());

    let mut candidate = name.to_string();
    for i in 1..=MAX_RENAME_ATTEMPTS {
        candidate = match extension {
            Some(ext) => format!("{} ({}).{}", stem, i, ext),
            None => format!("{} ({})", stem, i),
        };
        if !taken.contains(&candidate) {
            return candidate;
        }
    }
    candidate
}

/// Get a unique filesystem path, suffixing " (1)", " (2)", ... before the
/// extension while the path exists.
///
/// Used by the filesystem download sink so repeated exports on the same day
/// do not clobber each other.
pub fn get_unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    let extension = path.extension().and_then(|e| e.to_str());
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut candidate = path.to_path_buf();
    for i in 1..=MAX_RENAME_ATTEMPTS {
        let new_name = match extension {
            Some(ext) => format!("{} ({}).{}", stem, i, ext),
            None => format!("{} ({})", stem, i),
        };
        candidate = parent.join(new_name);
        if !candidate.exists() {
            return candidate;
        }
    }
    candidate
}

/// Archive download filename: `{prefix}-{topic}-{YYYY-MM-DD}.zip`
pub fn archive_filename(prefix: &str, topic: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}-{}.zip", prefix, topic, now.format("%Y-%m-%d"))
}

/// Table download filename: `{prefix}-{topic}-{YYYY-MM-DDTHH-MM-SS}.csv`
///
/// Colons are avoided in the time portion so the name is valid on every
/// filesystem the delivered file may land on.
pub fn table_filename(prefix: &str, topic: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}-{}.csv", prefix, topic, now.format("%Y-%m-%dT%H-%M-%S"))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_entry_name("booth-001.jpg"), "booth-001.jpg");
        assert_eq!(sanitize_entry_name("with space.png"), "with space.png");
    }

    #[test]
    fn sanitize_flattens_path_segments() {
        assert_eq!(sanitize_entry_name("events/2026/photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_entry_name("..\\..\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_entry_name("/photo.jpg"), "photo.jpg");
    }

    #[test]
    fn sanitize_falls_back_on_empty_names() {
        assert_eq!(sanitize_entry_name(""), "file");
        assert_eq!(sanitize_entry_name("dir/"), "file");
        assert_eq!(sanitize_entry_name(".."), "file");
        assert_eq!(sanitize_entry_name("\u{0}\u{1}"), "file");
    }

    #[test]
    fn unique_name_passes_through_when_free() {
        let taken = HashSet::new();
        assert_eq!(unique_name("a.jpg", &taken), "a.jpg");
    }

    #[test]
    fn unique_name_suffixes_before_extension() {
        let mut taken = HashSet::new();
        taken.insert("a.jpg".to_string());
        assert_eq!(unique_name("a.jpg", &taken), "a (1).jpg");

        taken.insert("a (1).jpg".to_string());
        assert_eq!(unique_name("a.jpg", &taken), "a (2).jpg");
    }

    #[test]
    fn unique_name_without_extension() {
        let mut taken = HashSet::new();
        taken.insert("notes".to_string());
        assert_eq!(unique_name("notes", &taken), "notes (1)");
    }

    #[test]
    fn unique_name_handles_multiple_dots() {
        let mut taken = HashSet::new();
        taken.insert("clip.final.mp4".to_string());
        assert_eq!(unique_name("clip.final.mp4", &taken), "clip.final (1).mp4");
    }

    #[test]
    fn unique_path_suffixes_existing_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("export.zip");

        assert_eq!(get_unique_path(&path), path);

        fs::write(&path, "first").unwrap();
        assert_eq!(
            get_unique_path(&path),
            temp_dir.path().join("export (1).zip")
        );
    }

    #[test]
    fn filename_templates() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 14, 30, 5).unwrap();
        assert_eq!(
            archive_filename("export", "media", now),
            "export-media-2026-08-06.zip"
        );
        assert_eq!(
            table_filename("export", "leads", now),
            "export-leads-2026-08-06T14-30-05.csv"
        );
    }
}
