//! Sitemap XML parser
//!
//! Recognizes the two sitemap document kinds by their root element and
//! collects every `<loc>` value. Namespaces are ignored.

use crate::sitemap::{SitemapError, SitemapResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Kind of sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: locations are other sitemaps
    Index,
    /// `<urlset>`: locations are pages
    UrlSet,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    /// Trimmed `<loc>` values in document order, unresolved
    pub locations: Vec<String>,
}

/// Parses sitemap XML
///
/// # Arguments
///
/// * `data` - Decompressed document bytes
/// * `source` - Where the document came from, for error messages
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - Index or url set with its locations
/// * `Err(SitemapError::Parse)` - Malformed or truncated XML
/// * `Err(SitemapError::UnsupportedFormat)` - Root is neither `sitemapindex` nor `urlset`
pub fn parse_sitemap(data: &[u8], source: &str) -> SitemapResult<SitemapDocument> {
    let parse_error = |message: String| SitemapError::Parse {
        url: source.to_string(),
        message,
    };

    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<String> = None;
    let mut depth = 0usize;
    let mut in_loc = false;
    let mut current = String::new();
    let mut locations = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                depth += 1;
                if name == "loc" {
                    in_loc = true;
                    current.clear();
                }
                root.get_or_insert(name);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                root.get_or_insert(name);
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                if in_loc && e.local_name().as_ref() == b"loc" {
                    in_loc = false;
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locations.push(loc.to_string());
                    }
                }
            }
            Ok(Event::Text(text)) if in_loc => {
                let text = text.unescape().map_err(|e| parse_error(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::CData(data)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(parse_error(format!(
                    "{} at byte {}",
                    e,
                    reader.buffer_position()
                )))
            }
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(parse_error(format!(
            "unexpected end of document with {} unclosed element(s)",
            depth
        )));
    }

    let root = root.ok_or_else(|| parse_error("document has no root element".to_string()))?;

    let kind = match root.as_str() {
        "sitemapindex" => SitemapKind::Index,
        "urlset" => SitemapKind::UrlSet,
        _ => {
            return Err(SitemapError::UnsupportedFormat {
                url: source.to_string(),
                root,
            })
        }
    };

    Ok(SitemapDocument { kind, locations })
}
