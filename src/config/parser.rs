use crate::config::types::UrlEntry;
use crate::config::validation::{validate_entry, warn_duplicate_outputs};
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a URL list from the given path
///
/// # Arguments
///
/// * `path` - Path to the URL list (`docs-config/apple_urls.txt`)
///
/// # Returns
///
/// * `Ok(Vec<UrlEntry>)` - Entries in file order
/// * `Err(ConfigError)` - Missing file, unreadable file or malformed line
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use apple_docs_sync::config::load_url_list;
///
/// let entries = load_url_list(Path::new("docs-config/apple_urls.txt")).unwrap();
/// println!("First page: {}", entries[0].source_url);
/// ```
pub fn load_url_list(path: &Path) -> Result<Vec<UrlEntry>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_url_list(&content)
}

/// Parses URL list text
///
/// One `<url> <output-filename>` pair per line, separated by any whitespace.
/// Blank lines are skipped. There is no comment syntax and no escaping.
pub fn parse_url_list(content: &str) -> Result<Vec<UrlEntry>, ConfigError> {
    let mut entries = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let mut fields = line.split_whitespace();

        let (source_url, output_filename) = match (fields.next(), fields.next(), fields.next())
        {
            (None, _, _) => continue,
            (Some(url), Some(name), None) => (url, name),
            (Some(_), None, _) => {
                return Err(ConfigError::InvalidLine {
                    line: line_number,
                    message: "missing output filename".to_string(),
                })
            }
            (Some(_), Some(_), Some(extra)) => {
                return Err(ConfigError::InvalidLine {
                    line: line_number,
                    message: format!("unexpected extra field '{}'", extra),
                })
            }
        };

        let entry = UrlEntry::new(source_url, output_filename);
        validate_entry(&entry, line_number)?;
        entries.push(entry);
    }

    warn_duplicate_outputs(&entries);

    Ok(entries)
}
