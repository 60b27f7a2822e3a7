//! Markdown snapshot files
//!
//! A snapshot is the converted page followed by a provenance footer:
//!
//! ```text
//! <markdown body>
//!
//! > Source: https://developer.apple.com/documentation/swiftui
//! > Snapshot: 2024-01-01T00:00:00Z
//! ```

use crate::output::{OutputError, OutputResult};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

const SOURCE_PREFIX: &str = "> Source: ";
const SNAPSHOT_PREFIX: &str = "> Snapshot: ";

/// What writing a snapshot did to the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotOutcome {
    /// No snapshot existed before
    Created,
    /// The body differs from the previous snapshot
    Updated,
    /// Same body as before; only the timestamp moved
    Unchanged,
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Renders a snapshot: body with trailing whitespace removed, a blank line,
/// then the source and snapshot lines
pub fn render_snapshot(body: &str, source_url: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}\n\n{}{}\n{}{}\n",
        body.trim_end(),
        SOURCE_PREFIX,
        source_url,
        SNAPSHOT_PREFIX,
        format_timestamp(at)
    )
}

/// Returns the body of a rendered snapshot, without its footer
///
/// Text that does not end with a provenance footer is returned trimmed.
pub fn strip_footer(snapshot: &str) -> &str {
    let trimmed = snapshot.trim_end();
    let Some(snapshot_at) = trimmed.rfind(SNAPSHOT_PREFIX) else {
        return trimmed;
    };
    let Some(source_at) = trimmed[..snapshot_at].rfind(SOURCE_PREFIX) else {
        return trimmed;
    };
    trimmed[..source_at].trim_end()
}

/// SHA-256 of a snapshot body, hex-encoded
pub fn body_digest(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.trim_end().as_bytes());
    hex::encode(hasher.finalize())
}

/// Writes a snapshot to `path`, overwriting any previous file
///
/// Parent directories are created as needed. The returned outcome compares
/// the new body with the body of the file that was replaced.
///
/// # Arguments
///
/// * `path` - Destination file
/// * `body` - Converted Markdown
/// * `source_url` - Page the body came from
/// * `at` - Snapshot time
pub fn write_snapshot(
    path: &Path,
    body: &str,
    source_url: &str,
    at: DateTime<Utc>,
) -> OutputResult<SnapshotOutcome> {
    let outcome = match fs::read_to_string(path) {
        Ok(previous) if body_digest(strip_footer(&previous)) == body_digest(body) => {
            SnapshotOutcome::Unchanged
        }
        Ok(_) => SnapshotOutcome::Updated,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => SnapshotOutcome::Created,
        // Unreadable previous file (e.g. not UTF-8): treat as replaced
        Err(_) => SnapshotOutcome::Updated,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, render_snapshot(body, source_url, at)).map_err(|source| {
        OutputError::Write {
            path: path.display().to_string(),
            source,
        }
    })?;

    Ok(outcome)
}
