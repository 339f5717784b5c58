use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

use crate::args::DownloadOptions;
use yt2mp3_core::{
    config::Config,
    downloader::{DownloadRequest, Downloader},
    events::ConsoleEvents,
    validate,
};

pub async fn run(url: &str, options: &DownloadOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    // Fail fast: everything is checked before yt-dlp is spawned
    validate::validate_url(url)?;
    let output_dir = super::resolve_output(&config, options)?;
    let yt_dlp = config.yt_dlp_path()?;

    let request = DownloadRequest {
        output_dir,
        playlist: options.playlist,
        rate_limit: options.rate_limit,
        metadata: config.metadata.enabled && !options.no_metadata,
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_chars("=>-"),
    );
    pb.set_message(format!("Downloading {}", truncate(url, 60)));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let downloader = Downloader::new(yt_dlp, request, Arc::new(ConsoleEvents));
    match downloader.download(url).await {
        Ok(done) => {
            pb.finish_with_message(format!("Done: {}", done.mp3_path.display()));
            Ok(())
        }
        Err(e) => {
            // A failed download is a reported outcome, not a process failure
            pb.abandon_with_message(format!("Failed: {}", e));
            Ok(())
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
