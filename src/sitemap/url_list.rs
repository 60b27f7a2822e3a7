//! URL list generation from sitemap crawls

use crate::config::{Settings, UrlEntry};
use crate::sitemap::crawler::{SitemapCrawl, SitemapCrawler};
use crate::sitemap::SitemapResult;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Summary of a generated URL list
#[derive(Debug, Clone)]
pub struct GeneratedConfig {
    pub entries: Vec<UrlEntry>,
    pub crawl: SitemapCrawl,
}

/// Derives a snapshot filename from a page URL
///
/// Path segments are lowercased, runs of other characters become `-`, and
/// the segments are joined with `_`. A leading `documentation` segment is
/// dropped when more segments follow.
///
/// ```
/// use apple_docs_sync::sitemap::derive_output_filename;
///
/// assert_eq!(
///     derive_output_filename("https://developer.apple.com/documentation/swiftui/view"),
///     "swiftui_view.md"
/// );
/// ```
pub fn derive_output_filename(url: &str) -> String {
    let mut segments: Vec<String> = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| segments.map(slugify).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default(),
        Err(_) => vec![slugify(url)],
    };

    if segments.len() > 1 && segments[0] == "documentation" {
        segments.remove(0);
    }

    if segments.is_empty() {
        "index.md".to_string()
    } else {
        format!("{}.md", segments.join("_"))
    }
}

fn slugify(segment: &str) -> String {
    let mut slug = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Keeps URLs matching any prefix; no prefixes keeps everything
///
/// A prefix matches the full URL or, when it starts with `/`, the URL path.
pub fn filter_by_prefix(urls: &[String], prefixes: &[String]) -> Vec<String> {
    if prefixes.is_empty() {
        return urls.to_vec();
    }

    urls.iter()
        .filter(|url| {
            let path = Url::parse(url).map(|u| u.path().to_string()).ok();
            prefixes.iter().any(|prefix| {
                url.starts_with(prefix.as_str())
                    || (prefix.starts_with('/')
                        && path.as_deref().is_some_and(|p| p.starts_with(prefix.as_str())))
            })
        })
        .cloned()
        .collect()
}

/// Pairs each URL with a unique output filename
///
/// Colliding names get `-2`, `-3`, ... before the extension.
pub fn build_entries(urls: &[String]) -> Vec<UrlEntry> {
    let mut used: HashSet<String> = HashSet::new();

    urls.iter()
        .map(|url| {
            let base = derive_output_filename(url);
            let mut name = base.clone();
            let stem = base.trim_end_matches(".md");
            let mut n = 2;
            while used.contains(&name) {
                name = format!("{}-{}.md", stem, n);
                n += 1;
            }
            used.insert(name.clone());
            UrlEntry::new(url.clone(), name)
        })
        .collect()
}

/// Renders entries in URL list format, one `<url> <filename>` per line
pub fn render_url_list(entries: &[UrlEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}\n", e.source_url, e.output_filename))
        .collect()
}

/// Writes a URL list, replacing any existing file
pub fn write_url_list(path: &Path, entries: &[UrlEntry]) -> SitemapResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_url_list(entries))?;
    Ok(())
}

/// Crawls `start` and rewrites the URL list at `output`
///
/// # Arguments
///
/// * `settings` - User agent and timeouts for sitemap requests
/// * `start` - Start sitemap (URL, `file://` URL or local path)
/// * `output` - URL list to write
/// * `prefixes` - Optional URL/path prefixes to keep
pub async fn generate_config(
    settings: &Settings,
    start: &str,
    output: &Path,
    prefixes: &[String],
) -> SitemapResult<GeneratedConfig> {
    let crawler = SitemapCrawler::new(settings)?;
    let crawl = crawler.crawl(start).await?;

    let urls = filter_by_prefix(&crawl.urls, prefixes);
    if urls.len() != crawl.urls.len() {
        tracing::info!(
            "Kept {} of {} URLs matching {:?}",
            urls.len(),
            crawl.urls.len(),
            prefixes
        );
    }

    let entries = build_entries(&urls);
    write_url_list(output, &entries)?;
    tracing::info!("Wrote {} entries to {}", entries.len(), output.display());

    Ok(GeneratedConfig { entries, crawl })
}
