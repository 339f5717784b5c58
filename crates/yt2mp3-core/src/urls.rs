//! URL discovery in free text

use crate::error::SetupError;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Substring identifying YouTube links; covers youtube.com and youtu.be.
pub const PLATFORM_MARKER: &str = "youtu";

// URL pattern from https://stackoverflow.com/a/6041965
const URL_PATTERN: &str =
    r"(http|https)://([\w_-]+(?:(?:\.[\w_-]+)+))([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])?";

pub fn is_youtube_url(url: &str) -> bool {
    url.contains(PLATFORM_MARKER)
}

/// Scan a text file for YouTube URLs.
///
/// Duplicates across the file collapse to one entry and order carries no
/// meaning. An empty set is a valid result: the caller treats it as a
/// terminal "no work" outcome, not as an extraction error.
pub fn extract_urls(path: &Path) -> Result<HashSet<String>, SetupError> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| SetupError::FileUnreadable(path.display().to_string()))?;
    Ok(extract_from_text(&content))
}

pub fn extract_from_text(content: &str) -> HashSet<String> {
    let pattern = Regex::new(URL_PATTERN).expect("URL pattern is valid");
    pattern
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .filter(|url| is_youtube_url(url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extract_filters_to_youtube() {
        let text = "watch https://www.youtube.com/watch?v=dQw4w9WgXcQ and \
                    also https://example.com/video plus http://youtu.be/abc123";
        let urls = extract_from_text(text);
        assert_eq!(urls.len(), 2);
        assert!(urls.iter().all(|u| u.contains(PLATFORM_MARKER)));
    }

    #[test]
    fn test_extract_collapses_duplicates() {
        let text = "https://youtu.be/abc123\nsome text\nhttps://youtu.be/abc123\n";
        let urls = extract_from_text(text);
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn test_extract_no_matches_is_empty_not_error() {
        let text = "no links here, just prose";
        assert!(extract_from_text(text).is_empty());
    }

    #[test]
    fn test_extract_urls_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first: https://www.youtube.com/watch?v=one").unwrap();
        writeln!(file, "junk line without a link").unwrap();
        writeln!(file, "again https://www.youtube.com/watch?v=one").unwrap();
        writeln!(file, "other https://vimeo.com/12345").unwrap();

        let urls = extract_urls(file.path()).unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://www.youtube.com/watch?v=one"));
    }

    #[test]
    fn test_extract_urls_missing_file() {
        let err = extract_urls(Path::new("/no/such/file.txt")).unwrap_err();
        assert!(matches!(err, SetupError::FileUnreadable(_)));
    }
}
