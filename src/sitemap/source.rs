use crate::sitemap::{SitemapError, SitemapResult};
use flate2::read::GzDecoder;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Where a sitemap document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapSource {
    Remote(Url),
    Local(PathBuf),
}

impl SitemapSource {
    /// Interprets `s` as an HTTP(S) URL, a `file://` URL or a filesystem path
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .unwrap_or_else(|_| Self::Local(PathBuf::from(url.path()))),
            // Anything else, including Windows drive letters, is a path
            _ => Self::Local(PathBuf::from(s)),
        }
    }

    /// Resolves a child sitemap location found in this document
    ///
    /// Absolute locations stand alone; relative ones are joined onto this
    /// document's URL, or onto its directory for local files.
    pub fn resolve(&self, loc: &str) -> Option<Self> {
        if is_absolute_url(loc) {
            return Some(Self::parse(loc));
        }
        match self {
            Self::Remote(base) => base.join(loc).ok().map(Self::Remote),
            Self::Local(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new(""));
                Some(Self::Local(dir.join(loc)))
            }
        }
    }

    /// Resolves a page location found in this document
    ///
    /// Absolute locations are kept verbatim.
    pub fn resolve_page(&self, loc: &str) -> String {
        match self {
            Self::Remote(base) if !is_absolute_url(loc) => base
                .join(loc)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| loc.to_string()),
            _ => loc.to_string(),
        }
    }

    /// Reads the document bytes, inflating gzip payloads
    pub async fn read(&self, client: &Client) -> SitemapResult<Vec<u8>> {
        match self {
            Self::Remote(url) => {
                let describe = |e: reqwest::Error| SitemapError::Unreachable {
                    url: url.to_string(),
                    message: e.to_string(),
                };

                let response = client.get(url.clone()).send().await.map_err(describe)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SitemapError::Unreachable {
                        url: url.to_string(),
                        message: format!("HTTP {}", status.as_u16()),
                    });
                }

                let content_type = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(|v| v.to_string());
                let raw = response.bytes().await.map_err(describe)?.to_vec();

                decode_payload(url.as_str(), raw, content_type.as_deref())
            }
            Self::Local(path) => {
                let raw = std::fs::read(path).map_err(|e| SitemapError::Unreachable {
                    url: path.display().to_string(),
                    message: if e.kind() == std::io::ErrorKind::NotFound {
                        "Unable to locate sitemap".to_string()
                    } else {
                        e.to_string()
                    },
                })?;

                decode_payload(&path.to_string_lossy(), raw, None)
            }
        }
    }
}

impl fmt::Display for SitemapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_absolute_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Inflates `raw` when it is gzip data
///
/// Gzip is recognized by its magic number. A `.gz` source or gzip
/// Content-Type without the magic number is accepted only if the bytes
/// already look like XML (the transport decoded them); otherwise the
/// payload is reported as a decompression failure.
pub fn decode_payload(
    source: &str,
    raw: Vec<u8>,
    content_type: Option<&str>,
) -> SitemapResult<Vec<u8>> {
    if raw.is_empty() {
        return Ok(raw);
    }

    if raw.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut inflated)
            .map_err(|e| SitemapError::Decompression {
                url: source.to_string(),
                message: e.to_string(),
            })?;
        return Ok(inflated);
    }

    let declared_gzip = source.to_ascii_lowercase().ends_with(".gz")
        || content_type
            .map(|ct| ct.to_ascii_lowercase().contains("gzip"))
            .unwrap_or(false);

    if declared_gzip && !looks_like_xml(&raw) {
        return Err(SitemapError::Decompression {
            url: source.to_string(),
            message: "payload is neither gzip data nor XML".to_string(),
        });
    }

    Ok(raw)
}

fn looks_like_xml(raw: &[u8]) -> bool {
    let body = raw.strip_prefix(&UTF8_BOM).unwrap_or(raw);
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b == b'<')
        .unwrap_or(false)
}
