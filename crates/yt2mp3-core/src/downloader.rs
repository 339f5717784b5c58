//! YouTube to MP3 downloader using yt-dlp

use crate::error::DownloadError;
use crate::events::EventLog;
use crate::tagger::{sanitize_filename, Tagger};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fixed bitrate handed to yt-dlp's audio extractor.
const AUDIO_BITRATE: &str = "192K";

/// Per-run download settings, built once from CLI flags and config.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub output_dir: PathBuf,
    /// Expand playlists instead of downloading the single video.
    pub playlist: bool,
    /// Transfer cap in KB/s, passed through to yt-dlp.
    pub rate_limit: Option<u64>,
    /// Write ID3 tags and cover art after the file lands.
    pub metadata: bool,
}

#[derive(Debug)]
pub struct Downloaded {
    pub mp3_path: PathBuf,
    pub info: TrackInfo,
}

/// The slice of yt-dlp's info JSON we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfo {
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, rename = "_filename")]
    pub filename: Option<String>,
}

pub struct Downloader {
    yt_dlp_path: PathBuf,
    request: DownloadRequest,
    tagger: Tagger,
    events: Arc<dyn EventLog>,
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, request: DownloadRequest, events: Arc<dyn EventLog>) -> Self {
        Self {
            yt_dlp_path,
            request,
            tagger: Tagger::new(),
            events,
        }
    }

    /// Download one URL to MP3, then tag it.
    ///
    /// A failure here is a per-item outcome: the caller (single run, batch
    /// loop, or pool worker) logs it and moves on to the next URL.
    pub async fn download(&self, url: &str) -> Result<Downloaded, DownloadError> {
        info!("Downloading audio from: {}", url);

        let output_template = self.request.output_dir.join("%(title)s.%(ext)s");

        let mut cmd = Command::new(&self.yt_dlp_path);
        cmd.args([
            // Format selection: best available audio
            "-f", "bestaudio/best",
            // Extract to MP3 at a fixed bitrate
            "--extract-audio",
            "--audio-format", "mp3",
            "--audio-quality", AUDIO_BITRATE,
        ]);

        if self.request.playlist {
            cmd.arg("--yes-playlist");
        } else {
            cmd.arg("--no-playlist");
        }

        if let Some(rate) = self.request.rate_limit {
            cmd.arg("--limit-rate").arg(format!("{}K", rate));
        }

        if self.request.metadata {
            // Sidecars for the tag writer; cleaned up after tagging
            cmd.args([
                "--write-info-json",
                "--write-thumbnail",
                "--convert-thumbnails", "jpg",
            ]);
        }

        cmd.arg("-o").arg(&output_template);
        // Print JSON to stdout for metadata parsing
        cmd.args(["--print-json", "--no-overwrites"]);
        cmd.arg(url);

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DownloadError::YtDlpNotFound
            } else {
                DownloadError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            self.events
                .error(stderr.lines().last().unwrap_or("yt-dlp failed"));

            if stderr.contains("Video unavailable") || stderr.contains("Private video") {
                return Err(DownloadError::VideoUnavailable(url.to_string()));
            }
            if stderr.contains("is not a valid URL") {
                return Err(DownloadError::InvalidUrl(url.to_string()));
            }
            return Err(DownloadError::YtDlpFailed(output.status.code()));
        }

        // One JSON object per downloaded entry; a playlist run prints several.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut first: Option<Downloaded> = None;
        for line in stdout.lines().filter(|l| l.trim_start().starts_with('{')) {
            let info: TrackInfo = serde_json::from_str(line)
                .map_err(|e| DownloadError::MetadataParse(e.to_string()))?;

            let mp3_path = self.resolve_mp3(&info)?;
            debug!("Downloaded: {}", mp3_path.display());
            self.events
                .info(&format!("[Downloaded] {}", mp3_path.display()));

            if self.request.metadata {
                if let Err(e) = self.tagger.apply(&mp3_path, &info).await {
                    warn!("Tagging failed for {}: {}", mp3_path.display(), e);
                }
            }

            if first.is_none() {
                first = Some(Downloaded { mp3_path, info });
            }
        }

        first.ok_or_else(|| DownloadError::OutputMissing(url.to_string()))
    }

    /// Locate the MP3 that the extraction left on disk.
    ///
    /// The info JSON reports the pre-conversion filename; swapping its
    /// extension normally lands on the MP3. yt-dlp sanitizes titles its own
    /// way, so fall back to scanning the output directory for a matching
    /// stem.
    fn resolve_mp3(&self, info: &TrackInfo) -> Result<PathBuf, DownloadError> {
        if let Some(ref reported) = info.filename {
            let candidate = Path::new(reported).with_extension("mp3");
            if candidate.exists() {
                return Ok(candidate);
            }
        }

        let want = sanitize_filename(&info.title);
        for entry in std::fs::read_dir(&self.request.output_dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem == want || stem == info.title {
                    return Ok(path);
                }
            }
        }

        Err(DownloadError::OutputMissing(info.title.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SilentEvents;

    fn downloader_for(dir: &Path) -> Downloader {
        Downloader::new(
            PathBuf::from("yt-dlp"),
            DownloadRequest {
                output_dir: dir.to_path_buf(),
                playlist: false,
                rate_limit: None,
                metadata: false,
            },
            Arc::new(SilentEvents),
        )
    }

    fn info_with(title: &str, filename: Option<String>) -> TrackInfo {
        TrackInfo {
            title: title.to_string(),
            artist: None,
            album: None,
            uploader: None,
            thumbnail: None,
            filename,
        }
    }

    #[test]
    fn test_resolve_mp3_from_reported_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("My Song.mp3");
        std::fs::write(&mp3, b"audio").unwrap();

        let reported = dir.path().join("My Song.webm").display().to_string();
        let dl = downloader_for(dir.path());
        let resolved = dl.resolve_mp3(&info_with("My Song", Some(reported))).unwrap();
        assert_eq!(resolved, mp3);
    }

    #[test]
    fn test_resolve_mp3_falls_back_to_directory_scan() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("Title_With_Special_Chars.mp3");
        std::fs::write(&mp3, b"audio").unwrap();

        let dl = downloader_for(dir.path());
        let resolved = dl
            .resolve_mp3(&info_with("Title/With:Special*Chars", None))
            .unwrap();
        assert_eq!(resolved, mp3);
    }

    #[test]
    fn test_resolve_mp3_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let dl = downloader_for(dir.path());
        let err = dl.resolve_mp3(&info_with("Nothing Here", None)).unwrap_err();
        assert!(matches!(err, DownloadError::OutputMissing(_)));
    }

    // Integration test: requires network plus yt-dlp and ffmpeg in PATH.
    #[tokio::test]
    #[ignore]
    async fn test_download_real_video() {
        if which::which("yt-dlp").is_err() || which::which("ffmpeg").is_err() {
            eprintln!("skipping: yt-dlp/ffmpeg not in PATH");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let dl = downloader_for(dir.path());
        let done = dl
            .download("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();
        assert!(done.mp3_path.exists());
    }
}
