//! HTML to Markdown conversion
//!
//! Uses htmd with GitHub-flavored conventions: ATX headings, fenced code
//! blocks. Document head metadata, scripts, styles and noscript fallbacks
//! are dropped.

use crate::SyncError;
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;

/// Tags whose content never reaches the snapshot
const SKIPPED_TAGS: [&str; 4] = ["head", "script", "style", "noscript"];

/// Reusable HTML to Markdown converter
pub struct Converter {
    inner: HtmlToMarkdown,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        let options = Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        };

        let inner = HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .options(options)
            .build();

        Self { inner }
    }

    /// Converts a document to Markdown
    ///
    /// # Arguments
    ///
    /// * `html` - Document text
    /// * `url` - Source URL, used in the error message
    pub fn convert(&self, html: &str, url: &str) -> Result<String, SyncError> {
        let markdown = self.inner.convert(html).map_err(|e| SyncError::Conversion {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(markdown.trim().to_string())
    }
}
