//! Integration tests for network fetching
//!
//! These tests use wiremock to exercise the retry loop, the fail-fast
//! policy and request headers against a local HTTP server.

use apple_docs_sync::config::{FetchMode, Settings};
use apple_docs_sync::sync::{build_http_client, run, FetchErrorKind, NetworkFetcher};
use apple_docs_sync::SyncError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Network settings with no delay between attempts
fn network_settings() -> Settings {
    Settings {
        fetch_mode: FetchMode::Network,
        user_agent: "TestAgent/1.0".to_string(),
        max_retries: 3,
        retry_delay_secs: 0,
        ..Settings::default()
    }
}

fn write_config(dir: &Path, lines: &[(String, &str)]) -> PathBuf {
    let content: String = lines
        .iter()
        .map(|(url, name)| format!("{} {}\n", url, name))
        .collect();
    let path = dir.join("apple_urls.txt");
    std::fs::write(&path, content).expect("Failed to write config");
    path
}

fn html(title: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body><h1>{}</h1></body></html>", title))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_succeeds_on_last_allowed_attempt() {
    let mock_server = MockServer::start().await;

    // Two failures, then success
    Mock::given(method("GET"))
        .and(path("/documentation/swiftui"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documentation/swiftui"))
        .respond_with(html("SwiftUI"))
        .mount(&mock_server)
        .await;

    let work = TempDir::new().unwrap();
    let url = format!("{}/documentation/swiftui", mock_server.uri());
    let config = write_config(work.path(), &[(url.clone(), "swiftui.md")]);
    let dest = work.path().join("out");

    let report = run(&network_settings(), &config, &dest)
        .await
        .expect("Sync should succeed on the third attempt");

    assert_eq!(report.entries[0].attempts, 3);
    assert_eq!(report.retries(), 2);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let content = std::fs::read_to_string(dest.join("swiftui.md")).unwrap();
    assert!(content.starts_with("# SwiftUI"));
    assert!(content.contains(&format!("> Source: {}", url)));
}

#[tokio::test]
async fn test_fails_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documentation/swiftui"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let work = TempDir::new().unwrap();
    let url = format!("{}/documentation/swiftui", mock_server.uri());
    let config = write_config(work.path(), &[(url, "swiftui.md")]);
    let dest = work.path().join("out");

    let error = run(&network_settings(), &config, &dest)
        .await
        .expect_err("Sync should fail");

    match &error {
        SyncError::Fetch(e) => {
            assert_eq!(e.attempts, 3);
            assert_eq!(e.kind, FetchErrorKind::Status(503));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }
    assert_eq!(error.exit_code(), 22);
    assert!(!dest.join("swiftui.md").exists());
}

#[tokio::test]
async fn test_first_failure_stops_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documentation/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    // Never reached
    Mock::given(method("GET"))
        .and(path("/documentation/uikit"))
        .respond_with(html("UIKit"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        &[
            (format!("{}/documentation/missing", mock_server.uri()), "missing.md"),
            (format!("{}/documentation/uikit", mock_server.uri()), "uikit.md"),
        ],
    );
    let dest = work.path().join("out");

    let result = run(&network_settings(), &config, &dest).await;
    assert!(matches!(result, Err(SyncError::Fetch(_))));
    assert!(!dest.join("missing.md").exists());
    assert!(!dest.join("uikit.md").exists());
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documentation/uikit"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(html("UIKit"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        &[(format!("{}/documentation/uikit", mock_server.uri()), "uikit.md")],
    );

    let report = run(&network_settings(), &config, &work.path().join("out"))
        .await
        .expect("Sync failed");
    assert_eq!(report.entries[0].attempts, 1);
}

#[tokio::test]
async fn test_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documentation/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/documentation/new", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/documentation/new"))
        .respond_with(html("New"))
        .mount(&mock_server)
        .await;

    let fetcher = NetworkFetcher::new(
        build_http_client(&network_settings()).unwrap(),
        1,
        Duration::ZERO,
    );
    let url = format!("{}/documentation/old", mock_server.uri());
    let document = fetcher.fetch(&url).await.expect("redirect should be followed");

    assert!(document.body.contains("<h1>New</h1>"));
    // The requested URL is kept for provenance
    assert_eq!(document.url, url);
}

#[tokio::test]
async fn test_single_attempt_when_max_retries_is_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = NetworkFetcher::new(
        build_http_client(&network_settings()).unwrap(),
        1,
        Duration::ZERO,
    );
    let error = fetcher
        .fetch(&format!("{}/anything", mock_server.uri()))
        .await
        .expect_err("should fail");
    assert_eq!(error.attempts, 1);
    assert_eq!(error.kind, FetchErrorKind::Status(500));
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("Slow").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let settings = Settings {
        request_timeout_secs: 1,
        ..network_settings()
    };
    let fetcher = NetworkFetcher::new(build_http_client(&settings).unwrap(), 1, Duration::ZERO);

    let error = fetcher
        .fetch(&format!("{}/slow", mock_server.uri()))
        .await
        .expect_err("should time out");
    assert_eq!(error.kind, FetchErrorKind::Timeout);
    assert_eq!(error.exit_code(), 28);
}
