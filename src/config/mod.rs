//! Configuration module for Apple-Docs-Sync
//!
//! This module handles two kinds of configuration:
//! - the URL list (`<url> <output-filename>` per line) that drives a sync
//! - process settings (fetch mode, retries, user agent, paths) layered from
//!   defaults, an optional TOML file and the environment
//!
//! # Example
//!
//! ```no_run
//! use apple_docs_sync::config::{load_url_list, Settings};
//!
//! let settings = Settings::from_env(None).unwrap();
//! let entries = load_url_list(&settings.config_path).unwrap();
//! println!("{} pages to sync", entries.len());
//! ```

mod parser;
mod settings;
mod types;
mod validation;

// Re-export types
pub use types::{FetchMode, Settings, SettingsFile, UrlEntry};

// Re-export parser functions
pub use parser::{load_url_list, parse_url_list};
pub use settings::{compute_settings_hash, load_settings_file, ENV_PREFIX};
