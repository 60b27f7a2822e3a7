//! Document fetcher
//!
//! This module retrieves page HTML for the sync pipeline, either:
//! - over HTTP, with a fixed-delay retry loop, or
//! - from a local fixture directory for offline runs

use crate::config::{FetchMode, Settings};
use crate::SyncError;
use reqwest::{redirect::Policy, Client};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why the last attempt for a URL failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Non-2xx response
    Status(u16),
    /// The request timed out
    Timeout,
    /// Could not connect
    Connect,
    /// Any other transport failure
    Transport(String),
}

/// Raised after every attempt for a URL has failed
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch {url} after {attempts} attempt(s): {}", describe(.kind))]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    pub kind: FetchErrorKind,
}

fn describe(kind: &FetchErrorKind) -> String {
    match kind {
        FetchErrorKind::Status(code) => format!("HTTP {}", code),
        FetchErrorKind::Timeout => "request timed out".to_string(),
        FetchErrorKind::Connect => "connection failed".to_string(),
        FetchErrorKind::Transport(message) => message.clone(),
    }
}

impl FetchError {
    /// Exit code matching the failure class
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            FetchErrorKind::Status(_) => 22,
            FetchErrorKind::Timeout => 28,
            FetchErrorKind::Connect => 7,
            FetchErrorKind::Transport(_) => 1,
        }
    }
}

impl From<reqwest::Error> for FetchErrorKind {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Raw document text plus the URL it was requested for
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub url: String,
    pub body: String,
    /// Attempts used (always 1 for fixtures)
    pub attempts: u32,
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// Redirects are followed (up to 10 hops) and gzip/brotli transfer
/// encodings are requested and decoded transparently.
pub fn build_http_client(settings: &Settings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.request_timeout())
        .connect_timeout(Duration::from_secs(10).min(settings.request_timeout()))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Network fetcher with fixed-delay retries
#[derive(Debug, Clone)]
pub struct NetworkFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl NetworkFetcher {
    pub fn new(client: Client, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            client,
            max_retries: max_retries.max(1),
            retry_delay,
        }
    }

    /// Fetches a URL, retrying failed attempts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return body |
    /// | Any other status | Retry after delay |
    /// | Timeout / connect / transport error | Retry after delay |
    /// | `max_retries` attempts used | Return `FetchError` for the last failure |
    ///
    /// The delay is only slept between attempts.
    pub async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError> {
        let mut attempt = 1;

        loop {
            tracing::debug!("GET {} (attempt {}/{})", url, attempt, self.max_retries);

            let kind = match self.attempt(url).await {
                Ok(body) => {
                    return Ok(FetchedDocument {
                        url: url.to_string(),
                        body,
                        attempts: attempt,
                    })
                }
                Err(kind) => kind,
            };

            if attempt >= self.max_retries {
                return Err(FetchError {
                    url: url.to_string(),
                    attempts: attempt,
                    kind,
                });
            }

            tracing::warn!(
                "Attempt {}/{} for {} failed ({}); retrying in {}s",
                attempt,
                self.max_retries,
                url,
                describe(&kind),
                self.retry_delay.as_secs()
            );
            tokio::time::sleep(self.retry_delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchErrorKind> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// Reads `<fixture_dir>/<output_stem>.html` instead of the network
#[derive(Debug, Clone)]
pub struct FixtureFetcher {
    fixture_dir: PathBuf,
}

impl FixtureFetcher {
    pub fn new(fixture_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixture_dir: fixture_dir.into(),
        }
    }

    pub fn fixture_path(&self, output_stem: &str) -> PathBuf {
        self.fixture_dir.join(format!("{}.html", output_stem))
    }

    pub fn fetch(&self, url: &str, output_stem: &str) -> Result<FetchedDocument, SyncError> {
        let path = self.fixture_path(output_stem);
        if !path.is_file() {
            return Err(SyncError::FixtureNotFound { path });
        }

        tracing::debug!("Reading fixture {} for {}", path.display(), url);
        let body = std::fs::read_to_string(&path)?;

        Ok(FetchedDocument {
            url: url.to_string(),
            body,
            attempts: 1,
        })
    }
}

/// Fetcher selected by the effective fetch mode
#[derive(Debug, Clone)]
pub enum Fetcher {
    Network(NetworkFetcher),
    Fixtures(FixtureFetcher),
}

impl Fetcher {
    /// Builds the fetcher for `mode`
    ///
    /// The HTTP client is only built for network mode.
    pub fn for_mode(mode: FetchMode, settings: &Settings) -> Result<Self, SyncError> {
        Ok(match mode {
            FetchMode::Network => Self::Network(NetworkFetcher::new(
                build_http_client(settings)?,
                settings.max_retries,
                settings.retry_delay(),
            )),
            FetchMode::Fixtures => Self::Fixtures(FixtureFetcher::new(&settings.fixture_dir)),
        })
    }

    pub fn mode(&self) -> FetchMode {
        match self {
            Self::Network(_) => FetchMode::Network,
            Self::Fixtures(_) => FetchMode::Fixtures,
        }
    }

    /// Retrieves the document for `url`
    ///
    /// `output_stem` names the fixture file in fixture mode and is ignored
    /// for network fetches.
    pub async fn fetch(&self, url: &str, output_stem: &str) -> Result<FetchedDocument, SyncError> {
        match self {
            Self::Network(fetcher) => Ok(fetcher.fetch(url).await?),
            Self::Fixtures(fetcher) => fetcher.fetch(url, output_stem),
        }
    }
}
