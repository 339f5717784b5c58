//! Pre-flight argument checks
//!
//! Every check here runs before the first yt-dlp invocation, so a bad
//! argument fails the run without any partial setup.

use crate::error::SetupError;
use crate::urls::is_youtube_url;
use std::fs::File;
use std::path::Path;

/// A URL is accepted when it parses as http(s) and points at YouTube.
pub fn validate_url(raw: &str) -> Result<(), SetupError> {
    let parsed = url::Url::parse(raw).map_err(|_| SetupError::InvalidUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || !is_youtube_url(raw) {
        return Err(SetupError::InvalidUrl(raw.to_string()));
    }
    Ok(())
}

pub fn readable_file(path: &Path) -> Result<(), SetupError> {
    if !path.is_file() {
        return Err(SetupError::FileUnreadable(path.display().to_string()));
    }
    File::open(path).map_err(|_| SetupError::FileUnreadable(path.display().to_string()))?;
    Ok(())
}

/// Writability is probed with a throwaway temp file rather than inspecting
/// permission bits, which lie under ACLs and read-only mounts.
pub fn writable_dir(path: &Path) -> Result<(), SetupError> {
    if !path.is_dir() {
        return Err(SetupError::DirMissing(path.display().to_string()));
    }
    tempfile::NamedTempFile::new_in(path)
        .map_err(|_| SetupError::DirUnwritable(path.display().to_string()))?;
    Ok(())
}

/// Rate limit in KB/s. Used as the clap value parser for `--rate-limit`.
pub fn parse_rate(raw: &str) -> Result<u64, SetupError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SetupError::InvalidRate(raw.to_string())),
    }
}
