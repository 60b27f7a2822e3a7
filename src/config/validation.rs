use crate::config::types::{Settings, UrlEntry};
use crate::ConfigError;
use std::collections::HashSet;
use std::path::{Component, Path};
use url::Url;

/// Validates process settings
pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            settings.max_retries
        )));
    }

    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if settings.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            settings.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates a single URL list entry
///
/// `line` is the 1-based line the entry came from, used in error messages.
pub fn validate_entry(entry: &UrlEntry, line: usize) -> Result<(), ConfigError> {
    let url = Url::parse(&entry.source_url).map_err(|e| ConfigError::InvalidLine {
        line,
        message: format!("invalid URL '{}': {}", entry.source_url, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidLine {
            line,
            message: format!("URL '{}' must use http or https", entry.source_url),
        });
    }

    validate_output_filename(&entry.output_filename).map_err(|message| {
        ConfigError::InvalidLine { line, message }
    })
}

/// Output filenames stay inside the destination directory
fn validate_output_filename(name: &str) -> Result<(), String> {
    let path = Path::new(name);

    if path.is_absolute() {
        return Err(format!("output filename '{}' must be relative", name));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(format!(
                    "output filename '{}' must not leave the destination directory",
                    name
                ))
            }
        }
    }

    if path.file_name().is_none() {
        return Err(format!("output filename '{}' has no file name", name));
    }

    Ok(())
}

/// Warns about output filenames that appear more than once
///
/// Duplicates are legal; the later entry overwrites the earlier snapshot.
pub fn warn_duplicate_outputs(entries: &[UrlEntry]) -> usize {
    let mut seen = HashSet::new();
    let mut duplicates = 0;

    for entry in entries {
        if !seen.insert(entry.output_filename.as_str()) {
            duplicates += 1;
            tracing::warn!(
                "Output '{}' listed more than once; {} will overwrite it",
                entry.output_filename,
                entry.source_url
            );
        }
    }

    duplicates
}
