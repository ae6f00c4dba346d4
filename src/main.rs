//! workshop-sync: mirror Steam Workshop content into a local add-on folder.
//!
//! Seed IDs (collections or single files) are expanded through the
//! `GetDetails` Web API into the flat set of downloadable items. Each item's
//! `.vpk` and preview `.jpg` are then re-downloaded only when the remote
//! metadata or the file on disk disagrees with the manifest from the last
//! run, so repeated runs are cheap.

#![warn(clippy::all)]

mod cli;
mod config;
mod download;
mod manifest;
mod report;
mod types;
mod workshop;

use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use config::Config;
use manifest::ManifestFile;
use workshop::WorkshopClient;

/// Exit status for missing or invalid configuration.
const EXIT_USAGE: u8 = 1;
/// Exit status for failures that abort the run (resolution, manifest).
const EXIT_FATAL: u8 = 2;

/// Resolve, report, and sync. Per-item failures are handled inside the sync
/// engine; anything returned from here is fatal.
async fn run(config: Config) -> anyhow::Result<()> {
    tracing::debug!(?config, "Starting workshop-sync");

    let http = reqwest::Client::builder()
        .user_agent(concat!("workshop-sync/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let provider = WorkshopClient::new(
        http.clone(),
        config.api_url.clone(),
        config.api_key.clone(),
    );
    let items = workshop::resolve(&provider, &config.seeds, config.request_delay)
        .await
        .context("Failed to resolve Workshop items")?;

    report::print_resolved(&items, &config.prefix);

    if config.list_only {
        return Ok(());
    }

    tokio::fs::create_dir_all(&config.prefix)
        .await
        .with_context(|| format!("Failed to create {}", config.prefix.display()))?;

    let mut manifest = ManifestFile::open(&config.manifest_path).await?;
    tracing::info!(
        path = %manifest.path().display(),
        entries = manifest.manifest().len(),
        "Opened manifest"
    );
    if manifest.manifest().is_empty() {
        tracing::info!("No previous sync recorded, every item will be downloaded");
    }

    download::sync_items(&http, items, &mut manifest, &config.sync_config()).await;

    manifest.close().await?;

    tracing::info!("Completed!");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .init();

    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n", e);
            let _ = cli::Cli::command().write_help(&mut std::io::stderr());
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
