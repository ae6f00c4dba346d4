//! Sync engine: reconciles resolved Workshop items against the manifest and
//! the files already on disk, downloads only what is stale, and commits each
//! item's manifest entry as soon as its downloads succeed.

pub mod error;
pub mod file;

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::manifest::types::{PREVIEW_EXTENSION, PRIMARY_EXTENSION};
use crate::manifest::{ManifestEntry, ManifestFile};
use crate::workshop::ResolvedItem;

use error::DownloadError;
use file::BlobTransport;

/// Subset of application config consumed by the sync engine.
/// Decoupled from CLI parsing so the engine can be tested independently.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub(crate) prefix: PathBuf,
    pub(crate) dry_run: bool,
    pub(crate) no_progress_bar: bool,
}

/// Which assets of one item need fetching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    pub primary: bool,
    pub preview: bool,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        !self.primary && !self.preview
    }
}

/// Outcome counts for one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Items whose files and manifest entry were already current.
    pub up_to_date: usize,
    /// Items that had at least one asset downloaded and were committed.
    pub updated: usize,
    /// Items skipped because a download or the manifest commit failed.
    pub failed: usize,
}

/// Size of the file at `path`, or `None` when it can't be stat'ed.
///
/// Missing files and any other stat error are treated the same way: the
/// asset is assumed stale and will be fetched again.
async fn on_disk_size(path: &Path, pb: &ProgressBar) -> Option<u64> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Some(meta.len()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            pb.suspend(|| tracing::warn!(path = %path.display(), "could not find file"));
            None
        }
        Err(e) => {
            pb.suspend(|| {
                tracing::warn!(path = %path.display(), "could not stat file: {}", e);
            });
            None
        }
    }
}

/// Decide whether one asset needs fetching.
///
/// Stale if there is no previous entry, the relevant remote metadata changed,
/// or the local file is missing or has a size other than the declared one.
fn asset_is_stale(
    previous: Option<&ManifestEntry>,
    metadata_changed: impl FnOnce(&ManifestEntry) -> bool,
    size_on_disk: Option<u64>,
    expected_size: &str,
) -> bool {
    let Some(previous) = previous else {
        return true;
    };
    let Some(size) = size_on_disk else {
        return true;
    };
    metadata_changed(previous) || size.to_string() != expected_size
}

fn log_asset_state(
    pb: &ProgressBar,
    item: &ResolvedItem,
    extension: &str,
    stale: bool,
    size_on_disk: Option<u64>,
    expected_size: &str,
) {
    let id = &item.entry.id;
    if !stale {
        pb.suspend(|| {
            tracing::info!("{}.{} ({}): already up to date", id, extension, item.title)
        });
        return;
    }
    if let Some(size) = size_on_disk.filter(|s| s.to_string() != expected_size) {
        pb.suspend(|| {
            tracing::info!(
                "{}.{} ({}): expected size {}, have {}",
                id,
                extension,
                item.title,
                expected_size,
                size
            )
        });
    }
}

/// Work out which of `item`'s assets are stale. Primary and preview are
/// checked independently of each other.
pub async fn plan_update(
    item: &ResolvedItem,
    previous: Option<&ManifestEntry>,
    prefix: &Path,
    pb: &ProgressBar,
) -> UpdatePlan {
    let current = &item.entry;
    let primary_size = on_disk_size(&current.primary_path(prefix), pb).await;
    let preview_size = on_disk_size(&current.preview_path(prefix), pb).await;

    let primary = asset_is_stale(
        previous,
        |prev| current.content_changed(prev),
        primary_size,
        &current.content_size,
    );
    let preview = asset_is_stale(
        previous,
        |prev| current.preview_changed(prev),
        preview_size,
        &current.preview_size,
    );

    log_asset_state(
        pb,
        item,
        PRIMARY_EXTENSION,
        primary,
        primary_size,
        &current.content_size,
    );
    log_asset_state(
        pb,
        item,
        PREVIEW_EXTENSION,
        preview,
        preview_size,
        &current.preview_size,
    );

    UpdatePlan { primary, preview }
}

/// Fetch the stale assets of one item: preview first, then primary.
/// Stops at the first failure, returning the destination that failed.
async fn fetch_assets(
    transport: &dyn BlobTransport,
    item: &ResolvedItem,
    plan: UpdatePlan,
    prefix: &Path,
) -> Result<(), (PathBuf, DownloadError)> {
    let entry = &item.entry;
    if plan.preview {
        let path = entry.preview_path(prefix);
        file::download_file(transport, &item.preview_url, &path, &entry.preview_size)
            .await
            .map_err(|e| (path, e))?;
    }
    if plan.primary {
        let path = entry.primary_path(prefix);
        file::download_file(transport, &item.file_url, &path, &entry.content_size)
            .await
            .map_err(|e| (path, e))?;
    }
    Ok(())
}

/// Create a progress bar with a consistent template.
///
/// Returns `ProgressBar::hidden()` when the user passed `--no-progress-bar` or
/// stdout is not a TTY (e.g. piped output, cron jobs).
fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    match ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("=> ")),
        Err(e) => tracing::debug!("Invalid progress bar template: {}", e),
    }
    pb
}

/// Bring the local folder in line with `items`.
///
/// Items are processed one at a time in ID order. A failure on one item is
/// logged and counted, never fatal: its manifest entry is left untouched so
/// it is retried on the next run, and the loop moves on. After every
/// successful item the manifest is rewritten in full, so an interrupted run
/// keeps everything committed before the interruption.
pub async fn sync_items(
    transport: &dyn BlobTransport,
    items: BTreeMap<String, ResolvedItem>,
    manifest: &mut ManifestFile,
    config: &SyncConfig,
) -> SyncSummary {
    let started = Instant::now();
    let pb = create_progress_bar(config.no_progress_bar, items.len() as u64);
    let mut summary = SyncSummary::default();

    for (id, item) in items {
        pb.set_message(item.title.clone());

        let previous = manifest.manifest().get(&id).cloned();
        let plan = plan_update(&item, previous.as_ref(), &config.prefix, &pb).await;

        if config.dry_run {
            if plan.preview {
                pb.suspend(|| {
                    tracing::info!(
                        "[DRY RUN] Would download {}",
                        item.entry.preview_path(&config.prefix).display()
                    )
                });
            }
            if plan.primary {
                pb.suspend(|| {
                    tracing::info!(
                        "[DRY RUN] Would download {}",
                        item.entry.primary_path(&config.prefix).display()
                    )
                });
            }
            if plan.is_empty() {
                summary.up_to_date += 1;
            } else {
                summary.updated += 1;
            }
            pb.inc(1);
            continue;
        }

        if let Err((path, e)) = fetch_assets(transport, &item, plan, &config.prefix).await {
            pb.suspend(|| {
                tracing::error!(
                    id = %id,
                    title = %item.title,
                    path = %path.display(),
                    "Download failed: {}",
                    e
                );
            });
            summary.failed += 1;
            pb.inc(1);
            continue;
        }

        match manifest.add_entry(item.entry.clone()).await {
            Ok(()) => {
                if plan.is_empty() {
                    summary.up_to_date += 1;
                } else {
                    summary.updated += 1;
                }
            }
            Err(e) => {
                pb.suspend(|| {
                    tracing::error!(
                        id = %id,
                        title = %item.title,
                        "Error adding entry to manifest: {}",
                        e
                    );
                });
                summary.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    if config.dry_run {
        tracing::info!("── Dry Run Summary ──");
        tracing::info!(
            "  {} items would be updated, {} up to date",
            summary.updated,
            summary.up_to_date
        );
    } else {
        tracing::info!("── Summary ──");
        tracing::info!(
            "  {} updated, {} up to date, {} failed",
            summary.updated,
            summary.up_to_date,
            summary.failed
        );
    }
    tracing::info!("  destination: {}", config.prefix.display());
    tracing::info!("  elapsed: {}", format_duration(started.elapsed()));

    summary
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
