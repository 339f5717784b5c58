use anyhow::{bail, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

use crate::args::DownloadOptions;
use yt2mp3_core::{
    config::Config,
    downloader::{DownloadRequest, Downloader},
    events::{ConsoleEvents, SilentEvents},
    pool::{self, PoolSummary},
    queue::{Job, WorkQueue},
    urls, validate,
};

pub async fn run(
    input: &Path,
    threads: Option<usize>,
    options: &DownloadOptions,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    // Fail fast: all argument checks happen before any network activity
    validate::readable_file(input)?;
    let output_dir = super::resolve_output(&config, options)?;
    let yt_dlp = config.yt_dlp_path()?;

    let found = urls::extract_urls(input)?;
    if found.is_empty() {
        // A valid extractor result, but a terminal one for a batch run
        bail!("no YouTube URLs found in {}", input.display());
    }

    let total = found.len();
    let workers = threads.unwrap_or(config.batch.workers);
    println!(
        "Found {} URL(s), downloading with {} worker(s)\n",
        total,
        workers.max(1)
    );

    let request = DownloadRequest {
        output_dir,
        playlist: options.playlist,
        rate_limit: options.rate_limit,
        metadata: config.metadata.enabled && !options.no_metadata,
    };

    let summary = if workers <= 1 {
        // Sequential path: no pool is created
        let downloader = Downloader::new(yt_dlp, request, Arc::new(ConsoleEvents));
        let mut summary = PoolSummary::default();
        for url in &found {
            match downloader.download(url).await {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    tracing::error!("{}: {}", url, e);
                    summary.failed += 1;
                }
            }
        }
        summary
    } else {
        run_pooled(found, workers, yt_dlp, request).await
    };

    println!("\n=== Batch Complete ===");
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed: {}", summary.failed);

    // Per-URL failures are logged above, never fatal
    Ok(())
}

async fn run_pooled(
    found: std::collections::HashSet<String>,
    workers: usize,
    yt_dlp: std::path::PathBuf,
    request: DownloadRequest,
) -> PoolSummary {
    let queue = Arc::new(WorkQueue::from_urls(found));

    let multi = MultiProgress::new();
    let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .expect("valid template")
        .tick_chars("=>-");

    // One spinner per worker; a worker only ever touches its own
    let spinners: Vec<ProgressBar> = (0..workers)
        .map(|i| {
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(spinner_style.clone());
            pb.set_message(format!("worker {}: idle", i + 1));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb
        })
        .collect();

    // Workers stay quiet on the console; their spinner carries the state
    let downloader = Arc::new(Downloader::new(yt_dlp, request, Arc::new(SilentEvents)));

    let handler = {
        let spinners = spinners.clone();
        let downloader = Arc::clone(&downloader);
        move |worker: usize, job: Job| {
            let pb = spinners[worker].clone();
            let downloader = Arc::clone(&downloader);
            async move {
                pb.set_message(format!("worker {}: {}", worker + 1, truncate(&job.url, 50)));
                match downloader.download(&job.url).await {
                    Ok(done) => {
                        pb.set_message(format!(
                            "worker {}: done {}",
                            worker + 1,
                            done.mp3_path
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                        ));
                        true
                    }
                    Err(e) => {
                        tracing::error!("{}: {}", job.url, e);
                        pb.set_message(format!("worker {}: failed {}", worker + 1, truncate(&job.url, 40)));
                        false
                    }
                }
            }
        }
    };

    let summary = pool::run_pool(queue, workers, handler).await;

    for pb in &spinners {
        pb.finish_and_clear();
    }
    summary
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
