//! Sync coordinator - drives fetch and conversion for every URL list entry
//!
//! Entries are processed strictly in file order, one at a time. The first
//! failure aborts the run; nothing after it is fetched.

use crate::config::{load_url_list, Settings, UrlEntry};
use crate::output::write_snapshot;
use crate::sync::converter::Converter;
use crate::sync::fetcher::Fetcher;
use crate::sync::report::{EntryReport, SyncReport};
use crate::SyncError;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Main sync coordinator
pub struct Coordinator {
    fetcher: Fetcher,
    converter: Converter,
}

impl Coordinator {
    /// Creates a coordinator for the effective fetch mode
    ///
    /// Logs a warning when the CI sandbox signal overrides network mode.
    pub fn new(settings: &Settings) -> Result<Self, SyncError> {
        let mode = settings.effective_fetch_mode();

        if settings.is_mode_overridden() {
            tracing::warn!(
                "CI sandbox detected; using fixtures from {} instead of the network",
                settings.fixture_dir.display()
            );
        }

        Ok(Self {
            fetcher: Fetcher::for_mode(mode, settings)?,
            converter: Converter::new(),
        })
    }

    /// Syncs every entry of `config_path` into `dest_dir`
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReport)` - Every entry was written
    /// * `Err(SyncError)` - The first failure; later entries were not attempted
    pub async fn run(&self, config_path: &Path, dest_dir: &Path) -> Result<SyncReport, SyncError> {
        let entries = load_url_list(config_path)?;
        std::fs::create_dir_all(dest_dir)?;

        tracing::info!(
            "Syncing {} entries from {} into {} ({} mode)",
            entries.len(),
            config_path.display(),
            dest_dir.display(),
            self.fetcher.mode()
        );

        let mut report = SyncReport::new(self.fetcher.mode());

        for entry in &entries {
            match self.sync_entry(entry, dest_dir).await {
                Ok(entry_report) => report.entries.push(entry_report),
                Err(e) => {
                    tracing::error!("Sync aborted at {}: {}", entry.source_url, e);
                    return Err(e);
                }
            }
        }

        tracing::info!("Sync complete: {}", report.summary_line());

        Ok(report)
    }

    async fn sync_entry(&self, entry: &UrlEntry, dest_dir: &Path) -> Result<EntryReport, SyncError> {
        tracing::info!("Fetching {} -> {}", entry.source_url, entry.output_filename);

        let document = self
            .fetcher
            .fetch(&entry.source_url, &entry.output_stem())
            .await?;
        let markdown = self.converter.convert(&document.body, &document.url)?;

        let output_path: PathBuf = dest_dir.join(&entry.output_filename);
        let outcome = write_snapshot(&output_path, &markdown, &document.url, Utc::now())?;

        tracing::debug!("Wrote {} ({:?})", output_path.display(), outcome);

        Ok(EntryReport {
            source_url: entry.source_url.clone(),
            output_path,
            outcome,
            attempts: document.attempts,
        })
    }
}

/// Runs a complete sync using the paths from `settings`
///
/// # Example
///
/// ```no_run
/// use apple_docs_sync::{run_sync, Settings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::from_env(None)?;
/// let report = run_sync(&settings).await?;
/// println!("{}", report.summary_line());
/// # Ok(())
/// # }
/// ```
pub async fn run_sync(settings: &Settings) -> Result<SyncReport, SyncError> {
    run(settings, &settings.config_path, &settings.dest_dir).await
}

/// Runs a sync with explicit config and destination paths
///
/// The config file is checked before anything else, so a missing list fails
/// without building a client or touching the destination.
pub async fn run(
    settings: &Settings,
    config_path: &Path,
    dest_dir: &Path,
) -> Result<SyncReport, SyncError> {
    if !config_path.exists() {
        return Err(crate::ConfigError::NotFound(config_path.to_path_buf()).into());
    }

    let coordinator = Coordinator::new(settings)?;
    coordinator.run(config_path, dest_dir).await
}
