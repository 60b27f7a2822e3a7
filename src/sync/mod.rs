//! Sync module: the fetch → convert → write pipeline
//!
//! This module contains:
//! - Fetching page HTML from the network (with retry) or from fixtures
//! - HTML to Markdown conversion
//! - The sequential, fail-fast sync coordinator
//! - The run report

mod converter;
mod coordinator;
mod fetcher;
mod report;

pub use converter::Converter;
pub use coordinator::{run, run_sync, Coordinator};
pub use fetcher::{
    build_http_client, FetchError, FetchErrorKind, FetchedDocument, Fetcher, FixtureFetcher,
    NetworkFetcher,
};
pub use report::{EntryReport, SyncReport};
