//! Sitemap module for regenerating the URL list
//!
//! This module handles:
//! - Reading sitemap documents from HTTP(S) URLs, `file://` URLs or paths
//! - Inflating gzip-compressed sitemaps (`.xml.gz`)
//! - Parsing sitemap indexes and url sets
//! - Recursively flattening an index into an ordered, deduplicated URL list
//! - Writing the result as a URL list file

mod crawler;
mod parser;
mod source;
mod url_list;

pub use crawler::{gather_urls, FailedSitemap, SitemapCrawl, SitemapCrawler};
pub use parser::{parse_sitemap, SitemapDocument, SitemapKind};
pub use source::{decode_payload, SitemapSource};
pub use url_list::{
    build_entries, derive_output_filename, filter_by_prefix, generate_config, render_url_list,
    write_url_list, GeneratedConfig,
};

use thiserror::Error;

/// Errors raised while reading or parsing sitemaps
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Unable to download sitemap ({url}): {message}")]
    Unreachable { url: String, message: String },

    #[error("Unable to parse sitemap XML ({url}): {message}")]
    Parse { url: String, message: String },

    #[error("Unsupported sitemap format ({url}): root element <{root}>")]
    UnsupportedFormat { url: String, root: String },

    #[error("Failed to decompress gzip payload ({url}): {message}")]
    Decompression { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations
pub type SitemapResult<T> = Result<T, SitemapError>;
