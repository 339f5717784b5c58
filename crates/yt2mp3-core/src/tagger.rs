//! ID3 tagging and cover art embedding
//!
//! Runs after a file lands on disk. Everything here is best-effort: a
//! missing MP3 is skipped with a warning and cleanup failures only warn,
//! so tagging can never abort the download pipeline.

use crate::downloader::TrackInfo;
use crate::error::TagError;
use id3::frame::{Content, Picture, PictureType};
use id3::{Frame, Tag, TagLike, Version};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Tagger {
    http: reqwest::Client,
}

impl Tagger {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Write title/artist/album frames and embed cover art, then remove the
    /// sidecar files yt-dlp left next to the MP3.
    pub async fn apply(&self, mp3: &Path, info: &TrackInfo) -> Result<(), TagError> {
        if !mp3.exists() {
            warn!("Skipping tags, file does not exist: {}", mp3.display());
            return Ok(());
        }

        let mut tag = Tag::read_from_path(mp3).unwrap_or_else(|_| Tag::new());
        tag.set_title(info.title.as_str());

        // Uploader stands in for artist when the extractor has no artist
        if let Some(artist) = info.artist.as_deref().or(info.uploader.as_deref()) {
            tag.set_artist(artist);
        }
        if let Some(album) = info.album.as_deref() {
            tag.set_album(album);
        }

        if let Some((mime, data)) = self.cover_art(mp3, info).await {
            tag.add_frame(Frame::with_content(
                "APIC",
                Content::Picture(Picture {
                    mime_type: mime,
                    picture_type: PictureType::CoverFront,
                    description: String::new(),
                    data,
                }),
            ));
        }

        tag.write_to_path(mp3, Version::Id3v24)?;
        debug!("Tagged: {}", mp3.display());

        self.cleanup_sidecars(mp3);
        Ok(())
    }

    /// Cover art source: the sidecar thumbnail on disk, or a fetch of the
    /// thumbnail URL from the info record when no sidecar was written.
    /// Neither existing is fine; the tag just gets no APIC frame.
    async fn cover_art(&self, mp3: &Path, info: &TrackInfo) -> Option<(String, Vec<u8>)> {
        if let Some(path) = sidecar_thumbnail(mp3) {
            match std::fs::read(&path) {
                Ok(data) => return Some((mime_for(&path), data)),
                Err(e) => warn!("Failed to read thumbnail {}: {}", path.display(), e),
            }
        }

        let url = info.thumbnail.as_deref()?;
        match self.fetch_thumbnail(url).await {
            Ok(data) => Some(("image/jpeg".to_string(), data)),
            Err(e) => {
                warn!("Thumbnail fetch failed: {}", e);
                None
            }
        }
    }

    async fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>, TagError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TagError::ThumbnailFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TagError::ThumbnailFetch(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TagError::ThumbnailFetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn cleanup_sidecars(&self, mp3: &Path) {
        let mut sidecars: Vec<PathBuf> = vec![mp3.with_extension("info.json")];
        if let Some(thumb) = sidecar_thumbnail(mp3) {
            sidecars.push(thumb);
        }
        for path in sidecars {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Failed to remove sidecar {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Default for Tagger {
    fn default() -> Self {
        Self::new()
    }
}

fn sidecar_thumbnail(mp3: &Path) -> Option<PathBuf> {
    for ext in ["jpg", "png", "webp"] {
        let path = mp3.with_extension(ext);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn mime_for(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
    .to_string()
}

/// Sanitize a title the way we expect it to appear on disk.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(title: &str, uploader: Option<&str>, album: Option<&str>) -> TrackInfo {
        TrackInfo {
            title: title.to_string(),
            artist: None,
            album: album.map(String::from),
            uploader: uploader.map(String::from),
            thumbnail: None,
            filename: None,
        }
    }

    #[tokio::test]
    async fn test_title_and_artist_frames_written() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("track.mp3");
        std::fs::write(&mp3, b"not really audio").unwrap();

        let tagger = Tagger::new();
        tagger
            .apply(&mp3, &info("My Song", Some("Example Channel"), None))
            .await
            .unwrap();

        let tag = Tag::read_from_path(&mp3).unwrap();
        assert_eq!(tag.title(), Some("My Song"));
        assert_eq!(tag.artist(), Some("Example Channel"));
        assert_eq!(tag.album(), None);
        // No thumbnail anywhere means no APIC frame
        assert_eq!(tag.pictures().count(), 0);
    }

    #[tokio::test]
    async fn test_album_frame_written_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("track.mp3");
        std::fs::write(&mp3, b"audio").unwrap();

        let tagger = Tagger::new();
        tagger
            .apply(&mp3, &info("Song", Some("Channel"), Some("Album")))
            .await
            .unwrap();

        let tag = Tag::read_from_path(&mp3).unwrap();
        assert_eq!(tag.album(), Some("Album"));
    }

    #[tokio::test]
    async fn test_sidecar_thumbnail_embedded_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("track.mp3");
        let thumb = dir.path().join("track.jpg");
        let sidecar_json = dir.path().join("track.info.json");
        std::fs::write(&mp3, b"audio").unwrap();
        std::fs::write(&thumb, b"\xff\xd8\xff jpeg bytes").unwrap();
        std::fs::write(&sidecar_json, b"{}").unwrap();

        let tagger = Tagger::new();
        tagger
            .apply(&mp3, &info("Song", Some("Channel"), None))
            .await
            .unwrap();

        let tag = Tag::read_from_path(&mp3).unwrap();
        assert_eq!(tag.pictures().count(), 1);
        assert!(!thumb.exists());
        assert!(!sidecar_json.exists());
        assert!(mp3.exists());
    }

    #[tokio::test]
    async fn test_missing_mp3_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mp3 = dir.path().join("never-downloaded.mp3");

        let tagger = Tagger::new();
        tagger
            .apply(&mp3, &info("Song", None, None))
            .await
            .unwrap();
        assert!(!mp3.exists());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Normal Title"), "Normal Title");
        assert_eq!(
            sanitize_filename("Title/With:Special*Chars"),
            "Title_With_Special_Chars"
        );
        assert_eq!(sanitize_filename("  Spaces  "), "Spaces");
    }
}
