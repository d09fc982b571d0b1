//! API models for the Tubegate info and download endpoints.
//!
//! The wire contract is deliberately independent of the collaborator's
//! internal schema: [`VideoInfoResponse`] is the stable payload shape for
//! `GET /api/info` and is produced by a pure transform over
//! [`VideoMetadata`]. Mapping the same metadata twice yields byte-identical
//! JSON.

use serde::{Deserialize, Deserializer, Serialize};

use crate::provider::{FormatDescriptor, VideoMetadata};

/// Fallback author name when the collaborator omits one. Documented
/// fallback policy, not inferred correctness.
const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Deserialize)]
pub struct InfoParams {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub url: Option<String>,
    pub itag: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
}

/// Desired media kind for a download request. Only `audio` selects the
/// audio rendition; any other value, known or not, means video, so a
/// garbled `type` parameter can never reject the request outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    Audio,
    #[default]
    Video,
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "audio" {
            MediaKind::Audio
        } else {
            MediaKind::Video
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfoResponse {
    pub video_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub duration: u64,
    pub views: u64,
    pub author: String,
    pub formats: Vec<FormatPayload>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FormatPayload {
    pub itag: u32,
    pub quality: Option<String>,
    #[serde(rename = "type")]
    pub media_type: String,
    pub container: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
    pub url: String,
    pub bitrate: Option<u64>,
    pub content_length: Option<u64>,
}

impl VideoInfoResponse {
    /// Pure transform from collaborator metadata to the stable contract.
    /// Thumbnail is the last (highest-resolution) entry of the
    /// collaborator's list.
    pub fn from_metadata(metadata: &VideoMetadata) -> Self {
        Self {
            video_id: metadata.video_id.clone(),
            title: metadata.title.clone(),
            thumbnail: metadata.thumbnails.last().map(|t| t.url.clone()),
            duration: metadata.duration_seconds,
            views: metadata.view_count,
            author: metadata
                .author
                .clone()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            formats: metadata.formats.iter().map(FormatPayload::from).collect(),
        }
    }
}

impl From<&FormatDescriptor> for FormatPayload {
    fn from(format: &FormatDescriptor) -> Self {
        Self {
            itag: format.itag,
            quality: format.quality.clone(),
            media_type: format.media_type.clone(),
            container: format.container.clone(),
            has_video: format.has_video,
            has_audio: format.has_audio,
            url: format.url.clone(),
            bitrate: format.bitrate,
            content_length: format.content_length,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Thumbnail;

    fn sample_metadata() -> VideoMetadata {
        VideoMetadata {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Sample".to_string(),
            thumbnails: vec![
                Thumbnail {
                    url: "https://i.ytimg.com/low.jpg".to_string(),
                    width: 120,
                    height: 90,
                },
                Thumbnail {
                    url: "https://i.ytimg.com/high.jpg".to_string(),
                    width: 1280,
                    height: 720,
                },
            ],
            duration_seconds: 212,
            view_count: 42,
            author: None,
            is_private: false,
            is_live: false,
            formats: vec![FormatDescriptor {
                itag: 18,
                quality: Some("360p".to_string()),
                media_type: "video/mp4".to_string(),
                container: Some("mp4".to_string()),
                has_video: true,
                has_audio: true,
                bitrate: Some(500_000),
                content_length: Some(1_000),
                url: "https://example.com/18".to_string(),
            }],
        }
    }

    #[test]
    fn mapper_picks_last_thumbnail_and_defaults_author() {
        let payload = VideoInfoResponse::from_metadata(&sample_metadata());

        assert_eq!(payload.thumbnail.as_deref(), Some("https://i.ytimg.com/high.jpg"));
        assert_eq!(payload.author, "Unknown");
        assert_eq!(payload.duration, 212);
        assert_eq!(payload.formats.len(), 1);
        assert_eq!(payload.formats[0].media_type, "video/mp4");
    }

    #[test]
    fn mapper_is_idempotent() {
        let metadata = sample_metadata();
        let first = serde_json::to_vec(&VideoInfoResponse::from_metadata(&metadata)).unwrap();
        let second = serde_json::to_vec(&VideoInfoResponse::from_metadata(&metadata)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn error_response_omits_empty_optionals() {
        let body = serde_json::to_string(&ErrorResponse {
            status: "error",
            code: "INVALID_URL",
            message: "Invalid YouTube URL".to_string(),
            suggestion: None,
            details: None,
        })
        .unwrap();

        assert!(!body.contains("suggestion"));
        assert!(!body.contains("details"));
    }

    #[test]
    fn media_kind_defaults_to_video() {
        let params: DownloadParams =
            serde_json::from_str(r#"{"url":"u","itag":"18"}"#).unwrap();
        assert_eq!(params.kind, MediaKind::Video);

        let params: DownloadParams =
            serde_json::from_str(r#"{"url":"u","itag":"140","type":"audio"}"#).unwrap();
        assert_eq!(params.kind, MediaKind::Audio);
    }

    #[test]
    fn unknown_media_kind_falls_back_to_video() {
        for raw in ["webm", "AUDIO", "", "both"] {
            let params: DownloadParams = serde_json::from_str(&format!(
                r#"{{"url":"u","itag":"18","type":"{raw}"}}"#
            ))
            .unwrap();
            assert_eq!(params.kind, MediaKind::Video, "type: {raw}");
        }
    }
}
