//! CLI command handlers

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::info;

use crate::app::client::MemoriesClient;
use crate::app::manifest::{load_manifest, resolve_manifest_path, ManifestStats};
use crate::app::timestamps::SystemClock;
use crate::app::worker::{RunSummary, TaskOutcome, TracingLog, WorkerPool};
use crate::cli::args::{DownloadArgs, ManifestAction, ManifestArgs};
use crate::cli::startup::initialize;
use crate::config::FetchConfig;
use crate::constants::workers;
use crate::errors::{AppError, Result};

/// Handle the download command, returning the run summary
///
/// The caller decides the process exit status from the summary; a run with
/// failed tasks still completes every remaining record.
pub async fn handle_download(args: DownloadArgs, config: FetchConfig) -> Result<RunSummary> {
    let config = args.apply_to(config);
    let context = initialize(config)?;

    let manifest_path = resolve_manifest_path(args.manifest.as_deref());
    let mut records = load_manifest(&manifest_path)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.dry_run {
        return Ok(dry_run_report(&records, &context.dirs));
    }

    let client = MemoriesClient::new(&context.config.client_config())
        .map_err(|e| AppError::generic(format!("could not build HTTP client: {e}")))?;

    let total = records.len() as u64;
    let (outcome_tx, outcome_rx) = mpsc::channel(workers::OUTCOME_CHANNEL_CAPACITY);
    let progress = tokio::spawn(report_progress(outcome_rx, total));

    let mut pool = WorkerPool::start(
        context.config.worker_config(),
        context.dirs,
        client,
        Arc::new(TracingLog),
        Arc::new(SystemClock),
        outcome_tx,
    );

    info!("Dispatching {} records to {} workers", total, pool.worker_count());
    for record in records {
        pool.submit(record).await?;
    }

    let summary = pool.wait().await;
    // Outcome sender is dropped once every worker exits; the reporter drains
    // whatever is left and finishes the bar.
    let _ = progress.await;

    println!("{summary}");
    Ok(summary)
}

/// Handle the manifest subcommands
pub fn handle_manifest(args: ManifestArgs) -> Result<()> {
    match args.action {
        ManifestAction::Info { file } => {
            let path = resolve_manifest_path(file.as_deref());
            let records = load_manifest(&path)?;
            let stats = ManifestStats::from_records(&records);

            println!("Manifest: {}", path.display());
            println!("  {}", stats);
            Ok(())
        }
    }
}

/// Classify every record without touching the network
fn dry_run_report(
    records: &[crate::app::models::MediaRecord],
    dirs: &crate::app::paths::MediaDirs,
) -> RunSummary {
    let stats = ManifestStats::from_records(records);
    println!(
        "Dry run: {} images -> {}, {} videos -> {}, {} unknown (skipped)",
        stats.images,
        dirs.image_dir.display(),
        stats.videos,
        dirs.video_dir.display(),
        stats.unknown
    );

    RunSummary {
        completed: 0,
        skipped_unknown: stats.unknown,
        failed: 0,
        bytes_written: 0,
    }
}

/// Drain task outcomes into a progress bar until all workers exit
async fn report_progress(mut outcome_rx: mpsc::Receiver<TaskOutcome>, total: u64) {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    while let Some(outcome) = outcome_rx.recv().await {
        match outcome {
            TaskOutcome::Completed { path, .. } => {
                bar.set_message(path.display().to_string());
            }
            TaskOutcome::SkippedUnknown { task_id, .. } => {
                bar.set_message(format!("skipped task {task_id} (unknown type)"));
            }
            TaskOutcome::Failed { task_id, .. } => {
                bar.set_message(format!("task {task_id} failed"));
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::MediaRecord;
    use crate::app::paths::MediaDirs;
    use std::path::PathBuf;

    fn record(media_type: &str) -> MediaRecord {
        MediaRecord {
            timestamp: "2023-06-01 14:30:00".to_string(),
            media_type: media_type.to_string(),
            source_link: "https://example.com/a".to_string(),
        }
    }

    #[test]
    fn test_dry_run_counts_without_network() {
        let records = vec![record("Image"), record("Video"), record("GIF")];
        let dirs = MediaDirs {
            image_dir: PathBuf::from("/media/images"),
            video_dir: PathBuf::from("/media/videos"),
        };

        let summary = dry_run_report(&records, &dirs);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.skipped_unknown, 1);
        assert!(summary.is_success());
    }
}
