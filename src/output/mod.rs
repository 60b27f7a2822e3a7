//! Output module for writing Markdown snapshots
//!
//! This module handles:
//! - Rendering a snapshot (Markdown body + provenance footer)
//! - Comparing a new body against the snapshot already on disk
//! - Writing snapshots under the destination directory

mod snapshot;

pub use snapshot::{
    body_digest, format_timestamp, render_snapshot, strip_footer, write_snapshot, SnapshotOutcome,
};

use thiserror::Error;

/// Errors that can occur while writing snapshots
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
