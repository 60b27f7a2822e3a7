use crate::config::types::{FetchMode, Settings, SettingsFile};
use crate::config::validation::validate_settings;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix shared by all settings environment variables
pub const ENV_PREFIX: &str = "APPLE_DOCS_";

/// Set by local GitHub Actions emulation (`act`)
const CI_SANDBOX_VAR: &str = "ACT";

impl Settings {
    /// Builds settings from defaults, an optional TOML file and the process
    /// environment, in that order of precedence (environment wins)
    ///
    /// # Arguments
    ///
    /// * `settings_path` - Optional path to a TOML settings file
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Validated settings
    /// * `Err(ConfigError)` - Unreadable file, bad value or failed validation
    pub fn from_env(settings_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match settings_path {
            Some(path) => load_settings_file(path)?,
            None => SettingsFile::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merges a settings file with values returned by `lookup`
    ///
    /// `lookup` receives full variable names (e.g. `APPLE_DOCS_MAX_RETRIES`).
    pub fn resolve<F>(file: SettingsFile, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        // Settings file layer
        if let Some(mode) = file.fetch_mode {
            settings.fetch_mode = FetchMode::from_str(&mode)?;
        }
        if let Some(dir) = file.fixture_dir {
            settings.fixture_dir = dir;
        }
        if let Some(agent) = file.user_agent {
            settings.user_agent = agent;
        }
        if let Some(retries) = file.max_retries {
            settings.max_retries = retries;
        }
        if let Some(delay) = file.retry_delay_secs {
            settings.retry_delay_secs = delay;
        }
        if let Some(timeout) = file.request_timeout_secs {
            settings.request_timeout_secs = timeout;
        }
        if let Some(path) = file.config_path {
            settings.config_path = path;
        }
        if let Some(path) = file.dest_dir {
            settings.dest_dir = path;
        }

        // Environment layer
        let env = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}")).filter(|v| !v.trim().is_empty())
        };

        if let Some(mode) = env("FETCH_MODE") {
            settings.fetch_mode = FetchMode::from_str(&mode)?;
        }
        if let Some(dir) = env("FIXTURE_DIR") {
            settings.fixture_dir = PathBuf::from(dir);
        }
        if let Some(agent) = env("USER_AGENT") {
            settings.user_agent = agent;
        }
        if let Some(retries) = env("MAX_RETRIES") {
            settings.max_retries = parse_number("MAX_RETRIES", &retries)?;
        }
        if let Some(delay) = env("RETRY_DELAY") {
            settings.retry_delay_secs = parse_number("RETRY_DELAY", &delay)?;
        }
        if let Some(timeout) = env("REQUEST_TIMEOUT") {
            settings.request_timeout_secs = parse_number("REQUEST_TIMEOUT", &timeout)?;
        }
        if let Some(path) = env("CONFIG") {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(path) = env("DEST") {
            settings.dest_dir = PathBuf::from(path);
        }

        // Presence alone is the signal
        settings.ci_sandbox = lookup(CI_SANDBOX_VAR).is_some();

        validate_settings(&settings)?;

        Ok(settings)
    }
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!(
            "{ENV_PREFIX}{name} must be a non-negative integer, got '{value}'"
        ))
    })
}

/// Reads and parses a TOML settings file
pub fn load_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Computes a SHA-256 hash of the settings file content
///
/// Logged at start-up so scheduled runs can be matched to the settings they
/// ran with.
pub fn compute_settings_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}
