//! Apple-Docs-Sync: offline Markdown snapshots of Apple developer documentation
//!
//! This crate downloads a curated list of documentation pages, converts them
//! to Markdown with a provenance footer, and can regenerate that list by
//! crawling Apple's sitemap indexes.

pub mod config;
pub mod output;
pub mod sitemap;
pub mod sync;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] sync::FetchError),

    #[error("Fixture not found: {}", path.display())]
    FixtureNotFound { path: PathBuf },

    #[error("Failed to convert {url}: {message}")]
    Conversion { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Process exit code reported for this error
    ///
    /// | Error | Code |
    /// |-------|------|
    /// | Configuration | 2 |
    /// | HTTP status failure | 22 |
    /// | Request timeout | 28 |
    /// | Connection failure | 7 |
    /// | Anything else | 1 |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Fetch(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid entry on line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Unknown fetch mode '{0}' (expected 'network' or 'fixtures')")]
    UnknownFetchMode(String),
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{FetchMode, Settings, UrlEntry};
pub use sitemap::{gather_urls, SitemapError};
pub use sync::{run_sync, SyncReport};
