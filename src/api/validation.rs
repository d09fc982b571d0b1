//! URL validation and video identifier extraction.
//!
//! A small ordered set of pattern rules over raw user input; the first rule
//! that captures an 11-character identifier wins. Pure functions, no network
//! access.

use std::sync::LazyLock;

use regex::Regex;

use crate::provider::VideoReference;

/// Ordered extraction rules: standard watch URL, shortened share domain,
/// embed path, shorts path.
static ID_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:www\.|m\.)?youtube\.com/watch\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"youtube\.com/shorts/([A-Za-z0-9_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("video id rule"))
    .collect()
});

/// Extract a platform video identifier from arbitrary user input.
///
/// Returns `None` when no rule matches; the caller maps that to
/// `INVALID_URL`.
pub fn extract_video_id(raw_url: &str) -> Option<VideoReference> {
    ID_RULES.iter().find_map(|rule| {
        rule.captures(raw_url)
            .and_then(|caps| caps.get(1))
            .map(|m| VideoReference::new(m.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn extracts_from_watch_url() {
        let reference =
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(reference.id, ID);
        assert_eq!(
            reference.canonical_url,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn extracts_regardless_of_surrounding_query_params() {
        let reference = extract_video_id(
            "https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ&t=42s",
        )
        .unwrap();
        assert_eq!(reference.id, ID);
    }

    #[test]
    fn extracts_from_share_embed_and_shorts_urls() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            let reference = extract_video_id(url)
                .unwrap_or_else(|| panic!("no id extracted from {url}"));
            assert_eq!(reference.id, ID, "url: {url}");
        }
    }

    #[test]
    fn rejects_unsupported_urls() {
        for url in [
            "",
            "not a url",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=tooshort",
            "https://www.youtube.com/playlist?list=PL123",
        ] {
            assert!(extract_video_id(url).is_none(), "url: {url}");
        }
    }
}
