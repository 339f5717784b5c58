pub mod batch;
pub mod config;
pub mod doctor;
pub mod download;
pub mod search;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::args::DownloadOptions;
use yt2mp3_core::config::fresh_output_dir;
use yt2mp3_core::{validate, Config};

/// Resolve the output directory before any network activity: an explicit
/// directory must already exist and be writable, no directory at all means
/// a fresh timestamped one.
pub(crate) fn resolve_output(config: &Config, options: &DownloadOptions) -> Result<PathBuf> {
    match options
        .output
        .as_deref()
        .or(config.output.directory.as_deref())
    {
        Some(dir) => {
            validate::writable_dir(dir)?;
            Ok(dir.to_path_buf())
        }
        None => Ok(fresh_output_dir(Path::new("."))?),
    }
}
