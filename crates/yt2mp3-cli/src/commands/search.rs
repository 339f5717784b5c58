use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};
use std::path::Path;

use crate::args::DownloadOptions;
use yt2mp3_core::{config::Config, search, search::SearchHit};

pub async fn run(
    query: &str,
    results: Option<usize>,
    options: &DownloadOptions,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let count = results.unwrap_or(config.search.results);
    let yt_dlp = config.yt_dlp_path()?;

    let hits = search::search(&yt_dlp, query, count).await?;
    if hits.is_empty() {
        println!("No results for \"{}\"", query);
        return Ok(());
    }

    let labels: Vec<String> = hits.iter().map(format_hit).collect();
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick a video")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    // Backing out of the picker is a normal no-work exit
    let Some(index) = picked else {
        println!("Nothing selected");
        return Ok(());
    };

    super::download::run(&hits[index].watch_url(), options, config_path).await
}

fn format_hit(hit: &SearchHit) -> String {
    let mut line = hit.title.clone();
    if let Some(ref uploader) = hit.uploader {
        line.push_str(&format!(" - {}", uploader));
    }
    if let Some(secs) = hit.duration {
        let secs = secs as u64;
        line.push_str(&format!(" ({}:{:02})", secs / 60, secs % 60));
    }
    line
}
