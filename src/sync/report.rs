//! Sync run report
//!
//! Collects the outcome of every entry written during a run and renders a
//! short summary for the command line.

use crate::config::FetchMode;
use crate::output::SnapshotOutcome;
use std::path::PathBuf;

/// Result of syncing one URL list entry
#[derive(Debug, Clone)]
pub struct EntryReport {
    pub source_url: String,
    pub output_path: PathBuf,
    pub outcome: SnapshotOutcome,
    pub attempts: u32,
}

/// Summary of a completed sync
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Mode the run actually used
    pub fetch_mode: FetchMode,

    /// Per-entry results, in URL list order
    pub entries: Vec<EntryReport>,
}

impl SyncReport {
    pub fn new(fetch_mode: FetchMode) -> Self {
        Self {
            fetch_mode,
            entries: Vec::new(),
        }
    }

    pub fn count(&self, outcome: SnapshotOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Attempts beyond the first, summed over all entries
    pub fn retries(&self) -> u32 {
        self.entries.iter().map(|e| e.attempts.saturating_sub(1)).sum()
    }

    /// One-line summary, e.g. `3 snapshots (1 created, 1 updated, 1 unchanged) via network`
    pub fn summary_line(&self) -> String {
        format!(
            "{} snapshots ({} created, {} updated, {} unchanged) via {}",
            self.entries.len(),
            self.count(SnapshotOutcome::Created),
            self.count(SnapshotOutcome::Updated),
            self.count(SnapshotOutcome::Unchanged),
            self.fetch_mode
        )
    }
}
