//! Error types for yt2mp3-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Yt2Mp3Error>;

#[derive(Error, Debug)]
pub enum Yt2Mp3Error {
    #[error("Setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Tagging failed: {0}")]
    Tag(#[from] TagError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pre-flight failures. All of these are raised before any network
/// activity and terminate the run.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Not a valid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("File does not exist or is not readable: {0}")]
    FileUnreadable(String),

    #[error("Directory does not exist: {0}")]
    DirMissing(String),

    #[error("Directory is not writable: {0}")]
    DirUnwritable(String),

    #[error("Rate limit must be a positive integer (KB/s), got: {0}")]
    InvalidRate(String),
}

/// Per-item failures. Callers log these and continue with the next URL.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("yt-dlp not found. Install with: pip install -U yt-dlp")]
    YtDlpNotFound,

    #[error("yt-dlp failed with exit code: {0:?}")]
    YtDlpFailed(Option<i32>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("No MP3 found on disk for: {0}")]
    OutputMissing(String),

    #[error("Failed to parse video metadata: {0}")]
    MetadataParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tagging failures never abort the pipeline; they are logged as warnings.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("ID3 write failed: {0}")]
    Id3(#[from] id3::Error),

    #[error("Thumbnail fetch failed: {0}")]
    ThumbnailFetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
