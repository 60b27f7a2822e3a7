use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::ConfigError;

/// Default browser signature sent with documentation requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// One line of the URL list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// Page to download
    pub source_url: String,

    /// Output path, relative to the destination directory
    pub output_filename: String,
}

impl UrlEntry {
    pub fn new(source_url: impl Into<String>, output_filename: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            output_filename: output_filename.into(),
        }
    }

    /// Output filename without its extension (`swiftui.md` -> `swiftui`)
    ///
    /// Subdirectories are kept, so `ui/view.md` becomes `ui/view`.
    pub fn output_stem(&self) -> String {
        let path = Path::new(&self.output_filename);
        match (path.parent(), path.file_stem()) {
            (Some(parent), Some(stem)) if !parent.as_os_str().is_empty() => parent
                .join(stem)
                .to_string_lossy()
                .into_owned(),
            (_, Some(stem)) => stem.to_string_lossy().into_owned(),
            _ => self.output_filename.clone(),
        }
    }
}

/// Where page HTML comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Live HTTP requests
    #[default]
    Network,
    /// `<fixture_dir>/<output_stem>.html` on local disk
    Fixtures,
}

impl FromStr for FetchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "network" => Ok(Self::Network),
            "fixtures" => Ok(Self::Fixtures),
            other => Err(ConfigError::UnknownFetchMode(other.to_string())),
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network"),
            Self::Fixtures => f.write_str("fixtures"),
        }
    }
}

/// Process settings, read once at start-up and passed down explicitly
#[derive(Debug, Clone)]
pub struct Settings {
    /// Requested fetch mode (see [`Settings::effective_fetch_mode`])
    pub fetch_mode: FetchMode,

    /// Directory holding `<stem>.html` fixtures
    pub fixture_dir: PathBuf,

    /// User-Agent header for every request
    pub user_agent: String,

    /// Total attempts per URL, including the first
    pub max_retries: u32,

    /// Pause between attempts (seconds)
    pub retry_delay_secs: u64,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Running inside a local CI emulation sandbox
    pub ci_sandbox: bool,

    /// URL list to sync
    pub config_path: PathBuf,

    /// Directory the snapshots are written to
    pub dest_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_mode: FetchMode::Network,
            fixture_dir: PathBuf::from("tests/fixtures/apple_docs"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 3,
            retry_delay_secs: 5,
            request_timeout_secs: 30,
            ci_sandbox: false,
            config_path: PathBuf::from("docs-config/apple_urls.txt"),
            dest_dir: PathBuf::from("Docs/Apple"),
        }
    }
}

impl Settings {
    /// Fetch mode after applying the CI sandbox override
    pub fn effective_fetch_mode(&self) -> FetchMode {
        if self.ci_sandbox {
            FetchMode::Fixtures
        } else {
            self.fetch_mode
        }
    }

    /// Returns true when the sandbox signal replaces an explicit network mode
    pub fn is_mode_overridden(&self) -> bool {
        self.ci_sandbox && self.fetch_mode == FetchMode::Network
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// On-disk settings file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(rename = "fetch-mode")]
    pub fetch_mode: Option<String>,

    #[serde(rename = "fixture-dir")]
    pub fixture_dir: Option<PathBuf>,

    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    #[serde(rename = "max-retries")]
    pub max_retries: Option<u32>,

    #[serde(rename = "retry-delay")]
    pub retry_delay_secs: Option<u64>,

    #[serde(rename = "request-timeout")]
    pub request_timeout_secs: Option<u64>,

    #[serde(rename = "config-path")]
    pub config_path: Option<PathBuf>,

    #[serde(rename = "dest-dir")]
    pub dest_dir: Option<PathBuf>,
}
