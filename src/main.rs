//! Apple-Docs-Sync main entry point
//!
//! This is the command-line interface for syncing Apple developer
//! documentation into Markdown snapshots.

use anyhow::Context;
use apple_docs_sync::config::compute_settings_hash;
use apple_docs_sync::sitemap::generate_config;
use apple_docs_sync::{run_sync, Settings};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Apple-Docs-Sync: offline Markdown snapshots of Apple developer documentation
///
/// Settings come from built-in defaults, an optional TOML file and
/// APPLE_DOCS_* environment variables (environment wins).
#[derive(Parser, Debug)]
#[command(name = "apple-docs-sync")]
#[command(version = "1.0.0")]
#[command(about = "Mirror Apple developer documentation as Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to a TOML settings file
    #[arg(long, global = true, value_name = "TOML")]
    settings: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every page in the URL list and write its Markdown snapshot
    Sync,

    /// Rebuild the URL list from a sitemap or sitemap index
    GenerateConfig {
        /// Start sitemap: URL, file:// URL or local path (may be .xml.gz)
        #[arg(value_name = "SITEMAP")]
        start: String,

        /// URL list to write (defaults to the configured list)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Only keep URLs starting with this URL or path prefix (repeatable)
        #[arg(long = "include", value_name = "PREFIX")]
        include: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = match load_settings(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {:#}", e);
            eprintln!("✗ {:#}", e);
            return ExitCode::from(2);
        }
    };

    match cli.command {
        Command::Sync => handle_sync(&settings).await,
        Command::GenerateConfig {
            start,
            output,
            include,
        } => {
            let output = output.unwrap_or_else(|| settings.config_path.clone());
            handle_generate_config(&settings, &start, &output, &include).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("apple_docs_sync=info,warn"),
            1 => EnvFilter::new("apple_docs_sync=debug,info"),
            2 => EnvFilter::new("apple_docs_sync=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    if let Some(path) = path {
        tracing::info!("Loading settings from: {}", path.display());
    }

    let settings = Settings::from_env(path).context("invalid settings")?;

    if let Some(path) = path {
        let hash = compute_settings_hash(path).context("failed to hash settings file")?;
        tracing::info!("Settings loaded (hash: {})", hash);
    }

    tracing::debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

/// Handles the sync operation
async fn handle_sync(settings: &Settings) -> ExitCode {
    match run_sync(settings).await {
        Ok(report) => {
            if report.retries() > 0 {
                tracing::info!("{} request(s) needed a retry", report.retries());
            }
            eprintln!("✓ {}", report.summary_line());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Sync failed: {}", e);
            eprintln!("✗ {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Handles the generate-config operation
async fn handle_generate_config(
    settings: &Settings,
    start: &str,
    output: &Path,
    include: &[String],
) -> ExitCode {
    match generate_config(settings, start, output, include).await {
        Ok(generated) => {
            for failed in &generated.crawl.failed {
                eprintln!("✗ skipped {}: {}", failed.source, failed.error);
            }
            eprintln!(
                "✓ Wrote {} entries to {}",
                generated.entries.len(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Config generation failed: {}", e);
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}
