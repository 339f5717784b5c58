use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "yt2mp3")]
#[command(author, version, about = "A simple YouTube to MP3 converter")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube URL to download (shorthand for `download <URL>`)
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    #[command(flatten)]
    pub options: DownloadOptions,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a single URL
    Download {
        /// YouTube URL
        url: String,

        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Download every YouTube URL found in a text file
    Batch {
        /// File with YouTube URLs anywhere in its text
        #[arg(short, long)]
        input: PathBuf,

        /// Worker count; 1 or less downloads sequentially
        #[arg(short, long)]
        threads: Option<usize>,

        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Search YouTube and pick a result to download
    Search {
        /// Free-text query
        query: String,

        /// Number of results to list
        #[arg(short = 'n', long)]
        results: Option<usize>,

        #[command(flatten)]
        options: DownloadOptions,
    },

    /// Check that yt-dlp and ffmpeg are available
    Doctor,

    /// Show configuration
    Config,
}

#[derive(clap::Args, Clone, Debug)]
pub struct DownloadOptions {
    /// Expand playlists instead of downloading a single video
    #[arg(short, long)]
    pub playlist: bool,

    /// Output directory (default: a fresh timestamped directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-download transfer cap in KB/s
    #[arg(short, long, value_parser = parse_rate_arg)]
    pub rate_limit: Option<u64>,

    /// Skip ID3 tagging and cover art
    #[arg(long)]
    pub no_metadata: bool,
}

fn parse_rate_arg(raw: &str) -> Result<u64, String> {
    yt2mp3_core::validate::parse_rate(raw).map_err(|e| e.to_string())
}
