//! YouTube search via yt-dlp's ytsearch extractor

use crate::error::DownloadError;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl SearchHit {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Run a free-text search and return the flat result list.
///
/// Picking a result is the caller's concern; this module never prompts.
pub async fn search(
    yt_dlp_path: &Path,
    query: &str,
    count: usize,
) -> Result<Vec<SearchHit>, DownloadError> {
    info!("Searching YouTube for: {}", query);

    let target = format!("ytsearch{}:{}", count, query);
    let output = Command::new(yt_dlp_path)
        .arg(&target)
        .args(["--dump-json", "--flat-playlist", "--skip-download"])
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DownloadError::YtDlpNotFound
            } else {
                DownloadError::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);
        return Err(DownloadError::YtDlpFailed(output.status.code()));
    }

    Ok(parse_hits(&String::from_utf8_lossy(&output.stdout)))
}

/// One JSON object per stdout line; entries that don't parse are skipped.
fn parse_hits(stdout: &str) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<SearchHit>(line) {
            Ok(hit) => hits.push(hit),
            Err(e) => debug!("Skipping unparsable search entry: {}", e),
        }
    }
    hits
}
