//! Integration tests for the sync pipeline in fixture mode
//!
//! These tests run the full config → fetch → convert → write cycle against
//! the HTML fixtures under `tests/fixtures/apple_docs`.

use apple_docs_sync::config::{FetchMode, Settings};
use apple_docs_sync::output::SnapshotOutcome;
use apple_docs_sync::sync::run;
use apple_docs_sync::{ConfigError, SyncError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/apple_docs")
}

/// Fixture-mode settings pointing at the checked-in fixtures
fn fixture_settings() -> Settings {
    Settings {
        fetch_mode: FetchMode::Fixtures,
        fixture_dir: fixture_dir(),
        retry_delay_secs: 0,
        ..Settings::default()
    }
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("apple_urls.txt");
    std::fs::write(&path, content).expect("Failed to write config");
    path
}

/// Drops the `> Snapshot:` line so runs can be compared byte for byte
fn without_timestamp(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.starts_with("> Snapshot: "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_swiftui_snapshot() {
    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/swiftui swiftui.md\n",
    );
    let dest = work.path().join("Docs/Apple");

    let report = run(&fixture_settings(), &config, &dest)
        .await
        .expect("Sync failed");
    assert_eq!(report.fetch_mode, FetchMode::Fixtures);
    assert_eq!(report.entries.len(), 1);

    let content = std::fs::read_to_string(dest.join("swiftui.md")).unwrap();
    assert!(content.contains("# SwiftUI"), "missing heading:\n{}", content);
    assert!(content.contains("## Overview"));
    assert!(!content.contains("window.analytics"));

    // Footer: blank line, source line, snapshot line, end of file
    let lines: Vec<&str> = content.lines().collect();
    let n = lines.len();
    assert!(n >= 4);
    assert_eq!(lines[n - 3], "");
    assert_eq!(
        lines[n - 2],
        "> Source: https://developer.apple.com/documentation/swiftui"
    );
    let stamp = lines[n - 1]
        .strip_prefix("> Snapshot: ")
        .expect("missing snapshot line");
    assert_eq!(stamp.len(), "2024-01-01T00:00:00Z".len());
    assert!(stamp.ends_with('Z'));
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%SZ").is_ok());
}

#[tokio::test]
async fn test_one_file_per_entry() {
    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/swiftui swiftui.md\n\n\
         https://developer.apple.com/documentation/uikit uikit.md\n",
    );
    let dest = work.path().join("out");

    let report = run(&fixture_settings(), &config, &dest).await.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.count(SnapshotOutcome::Created), 2);

    let mut names: Vec<String> = std::fs::read_dir(&dest)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["swiftui.md", "uikit.md"]);
}

#[tokio::test]
async fn test_second_run_identical_except_timestamp() {
    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/swiftui swiftui.md\n\
         https://developer.apple.com/documentation/uikit uikit.md\n",
    );
    let dest = work.path().join("out");
    let settings = fixture_settings();

    run(&settings, &config, &dest).await.unwrap();
    let first_swiftui = std::fs::read_to_string(dest.join("swiftui.md")).unwrap();
    let first_uikit = std::fs::read_to_string(dest.join("uikit.md")).unwrap();

    let report = run(&settings, &config, &dest).await.unwrap();
    assert_eq!(report.count(SnapshotOutcome::Unchanged), 2);

    let second_swiftui = std::fs::read_to_string(dest.join("swiftui.md")).unwrap();
    let second_uikit = std::fs::read_to_string(dest.join("uikit.md")).unwrap();

    assert_eq!(without_timestamp(&first_swiftui), without_timestamp(&second_swiftui));
    assert_eq!(without_timestamp(&first_uikit), without_timestamp(&second_uikit));
}

#[tokio::test]
async fn test_missing_fixture_aborts_without_output() {
    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/metal metal.md\n\
         https://developer.apple.com/documentation/swiftui swiftui.md\n",
    );
    let dest = work.path().join("out");

    let result = run(&fixture_settings(), &config, &dest).await;
    match result {
        Err(SyncError::FixtureNotFound { path }) => {
            assert!(path.ends_with("metal.html"), "unexpected path {}", path.display())
        }
        other => panic!("expected FixtureNotFound, got {:?}", other),
    }

    assert!(!dest.join("metal.md").exists());
    // Fail-fast: later entries are not attempted
    assert!(!dest.join("swiftui.md").exists());
}

#[tokio::test]
async fn test_missing_config_fails_before_creating_dest() {
    let work = TempDir::new().unwrap();
    let dest = work.path().join("out");

    let result = run(
        &fixture_settings(),
        &work.path().join("does-not-exist.txt"),
        &dest,
    )
    .await;

    let error = result.expect_err("missing config must fail");
    assert!(matches!(error, SyncError::Config(ConfigError::NotFound(_))));
    assert_eq!(error.exit_code(), 2);
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_nested_output_paths() {
    let work = TempDir::new().unwrap();
    let fixtures = work.path().join("fixtures");
    std::fs::create_dir_all(fixtures.join("frameworks")).unwrap();
    std::fs::write(fixtures.join("frameworks/metal.html"), "<h1>Metal</h1>").unwrap();

    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/metal frameworks/metal.md\n",
    );
    let dest = work.path().join("deep/out");
    let settings = Settings {
        fixture_dir: fixtures,
        ..fixture_settings()
    };

    run(&settings, &config, &dest).await.unwrap();
    let content = std::fs::read_to_string(dest.join("frameworks/metal.md")).unwrap();
    assert!(content.starts_with("# Metal\n\n> Source: https://developer.apple.com/documentation/metal\n"));
}

#[tokio::test]
async fn test_ci_sandbox_forces_fixture_mode() {
    let work = TempDir::new().unwrap();
    let config = write_config(
        work.path(),
        "https://developer.apple.com/documentation/uikit uikit.md\n",
    );
    let dest = work.path().join("out");
    let settings = Settings {
        fetch_mode: FetchMode::Network,
        ci_sandbox: true,
        ..fixture_settings()
    };

    let report = run(&settings, &config, &dest).await.unwrap();
    assert_eq!(report.fetch_mode, FetchMode::Fixtures);
    assert!(dest.join("uikit.md").exists());
}

#[tokio::test]
async fn test_invalid_config_line() {
    let work = TempDir::new().unwrap();
    let config = write_config(work.path(), "https://developer.apple.com/documentation/uikit\n");

    let result = run(&fixture_settings(), &config, &work.path().join("out")).await;
    assert!(matches!(
        result,
        Err(SyncError::Config(ConfigError::InvalidLine { line: 1, .. }))
    ));
}
