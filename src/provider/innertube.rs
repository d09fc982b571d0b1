//! InnerTube `/player` client.
//!
//! Talks to the platform's internal player endpoint with an Android client
//! context, which returns directly usable stream URLs. Error classification
//! keys off the structured `playabilityStatus` field; substring matching on
//! the human-readable reason is the final fallback only.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{
    ByteStream, FormatDescriptor, ProviderError, Thumbnail, VideoMetadata, VideoProvider,
    VideoReference,
};
use crate::config::ProviderConfig;

const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";

// Android client context; the player endpoint hands this client plain
// stream URLs instead of ciphered ones.
const ANDROID_CLIENT_VERSION: &str = "19.44.38";
const ANDROID_SDK_VERSION: i32 = 34;
const ANDROID_USER_AGENT: &str =
    "com.google.android.youtube/19.44.38 (Linux; U; Android 14; en_US; Pixel 8) gzip";

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern"));

pub struct InnerTubeProvider {
    client: reqwest::Client,
}

impl InnerTubeProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    fn player_body(reference: &VideoReference) -> serde_json::Value {
        json!({
            "videoId": reference.id,
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "androidSdkVersion": ANDROID_SDK_VERSION,
                    "hl": "en",
                    "gl": "US",
                }
            },
            "contentCheckOk": true,
            "racyCheckOk": true,
        })
    }
}

#[async_trait]
impl VideoProvider for InnerTubeProvider {
    fn recognizes(&self, reference: &VideoReference) -> bool {
        VIDEO_ID.is_match(&reference.id)
    }

    async fn fetch_metadata(
        &self,
        reference: &VideoReference,
    ) -> Result<VideoMetadata, ProviderError> {
        debug!(video_id = %reference.id, "Calling player endpoint");

        let response = self
            .client
            .post(PLAYER_ENDPOINT)
            .header(reqwest::header::USER_AGENT, ANDROID_USER_AGENT)
            .json(&Self::player_body(reference))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Request(format!(
                "player endpoint returned HTTP {status}"
            )));
        }

        let player: PlayerResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        build_metadata(reference, player)
    }

    async fn open_stream(&self, format: &FormatDescriptor) -> Result<ByteStream, ProviderError> {
        debug!(itag = format.itag, "Opening stream");

        let response = self
            .client
            .get(&format.url)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::Request(format!(
                "stream endpoint returned HTTP {status}"
            )));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| ProviderError::Request(e.to_string())));

        Ok(Box::pin(stream))
    }
}

/// Map the structured playability status first; fall back to substring
/// matching on the reason text only when the status itself is inconclusive.
fn build_metadata(
    reference: &VideoReference,
    player: PlayerResponse,
) -> Result<VideoMetadata, ProviderError> {
    let playability = player.playability_status.unwrap_or_default();
    let status = playability.status.as_deref().unwrap_or("UNKNOWN");
    let reason = playability.reason.unwrap_or_default();

    let mut is_private = false;
    match status {
        "OK" => {}
        // Private videos surface as LOGIN_REQUIRED; carried as a metadata
        // flag so the fetch path applies policy uniformly.
        "LOGIN_REQUIRED" => is_private = true,
        "UNPLAYABLE" | "ERROR" => {
            return Err(classify_reason(&reason));
        }
        other => {
            warn!(status = other, reason = %reason, "Unexpected playability status");
            return Err(classify_reason(&reason));
        }
    }

    let details = player.video_details.unwrap_or_default();
    let formats = collect_formats(player.streaming_data);

    Ok(VideoMetadata {
        video_id: details.video_id.unwrap_or_else(|| reference.id.clone()),
        title: details.title.unwrap_or_default(),
        thumbnails: details
            .thumbnail
            .map(|t| {
                t.thumbnails
                    .into_iter()
                    .map(|raw| Thumbnail {
                        url: raw.url,
                        width: raw.width,
                        height: raw.height,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        duration_seconds: details
            .length_seconds
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        view_count: details
            .view_count
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        author: details.author,
        is_private: is_private || details.is_private.unwrap_or(false),
        is_live: details.is_live_content.unwrap_or(false),
        formats,
    })
}

fn classify_reason(reason: &str) -> ProviderError {
    let lowered = reason.to_lowercase();
    if lowered.contains("unavailable") || lowered.contains("removed") {
        ProviderError::Unavailable(reason.to_string())
    } else if lowered.contains("rate") || lowered.contains("too many") {
        ProviderError::RateLimited
    } else {
        ProviderError::Request(reason.to_string())
    }
}

/// Muxed formats first, then adaptive ones, keeping the endpoint's own
/// ordering; variants without a usable URL or carrying neither audio nor
/// video are dropped.
fn collect_formats(streaming_data: Option<StreamingData>) -> Vec<FormatDescriptor> {
    let Some(data) = streaming_data else {
        return Vec::new();
    };

    data.formats
        .into_iter()
        .chain(data.adaptive_formats)
        .filter_map(convert_format)
        .filter(|f| f.has_video || f.has_audio)
        .collect()
}

fn convert_format(raw: RawFormat) -> Option<FormatDescriptor> {
    let url = raw.url?;
    let media_type = raw
        .mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let container = media_type
        .split('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    // Per the player schema a video rendition always carries a quality
    // label and an audible one an audio quality; neither implies the other.
    let has_video = raw.quality_label.is_some();
    let has_audio = raw.audio_quality.is_some();

    Some(FormatDescriptor {
        itag: raw.itag,
        quality: raw.quality_label.or(raw.quality),
        media_type,
        container,
        has_video,
        has_audio,
        bitrate: raw.bitrate,
        content_length: raw.content_length.and_then(|s| s.parse().ok()),
        url,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    video_details: Option<RawVideoDetails>,
    streaming_data: Option<StreamingData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideoDetails {
    video_id: Option<String>,
    title: Option<String>,
    length_seconds: Option<String>,
    view_count: Option<String>,
    author: Option<String>,
    is_private: Option<bool>,
    is_live_content: Option<bool>,
    thumbnail: Option<ThumbnailList>,
}

#[derive(Debug, Default, Deserialize)]
struct ThumbnailList {
    #[serde(default)]
    thumbnails: Vec<RawThumbnail>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingData {
    #[serde(default)]
    formats: Vec<RawFormat>,
    #[serde(default)]
    adaptive_formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormat {
    itag: u32,
    #[serde(default)]
    mime_type: String,
    quality_label: Option<String>,
    quality: Option<String>,
    audio_quality: Option<String>,
    bitrate: Option<u64>,
    content_length: Option<String>,
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_json(payload: serde_json::Value) -> PlayerResponse {
        serde_json::from_value(payload).expect("player response")
    }

    #[test]
    fn builds_metadata_from_ok_response() {
        let player = player_json(json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": {
                "videoId": "dQw4w9WgXcQ",
                "title": "Test Video",
                "lengthSeconds": "212",
                "viewCount": "1000",
                "author": "Channel",
                "isPrivate": false,
                "isLiveContent": false,
                "thumbnail": { "thumbnails": [
                    { "url": "https://i.ytimg.com/low.jpg", "width": 120, "height": 90 },
                    { "url": "https://i.ytimg.com/high.jpg", "width": 1280, "height": 720 }
                ]}
            },
            "streamingData": {
                "formats": [{
                    "itag": 18,
                    "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
                    "qualityLabel": "360p",
                    "audioQuality": "AUDIO_QUALITY_LOW",
                    "bitrate": 500000,
                    "contentLength": "12345",
                    "url": "https://example.com/18"
                }],
                "adaptiveFormats": [{
                    "itag": 140,
                    "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
                    "audioQuality": "AUDIO_QUALITY_MEDIUM",
                    "bitrate": 130000,
                    "url": "https://example.com/140"
                }]
            }
        }));

        let reference = VideoReference::new("dQw4w9WgXcQ");
        let metadata = build_metadata(&reference, player).unwrap();

        assert_eq!(metadata.title, "Test Video");
        assert_eq!(metadata.duration_seconds, 212);
        assert_eq!(metadata.view_count, 1000);
        assert_eq!(metadata.formats.len(), 2);

        let muxed = &metadata.formats[0];
        assert!(muxed.has_video && muxed.has_audio);
        assert_eq!(muxed.media_type, "video/mp4");
        assert_eq!(muxed.container.as_deref(), Some("mp4"));
        assert_eq!(muxed.content_length, Some(12345));

        let audio = &metadata.formats[1];
        assert!(!audio.has_video && audio.has_audio);
        assert_eq!(audio.itag, 140);
    }

    #[test]
    fn login_required_marks_video_private() {
        let player = player_json(json!({
            "playabilityStatus": {
                "status": "LOGIN_REQUIRED",
                "reason": "This is a private video."
            }
        }));

        let reference = VideoReference::new("dQw4w9WgXcQ");
        let metadata = build_metadata(&reference, player).unwrap();

        assert!(metadata.is_private);
        assert!(metadata.formats.is_empty());
    }

    #[test]
    fn unplayable_unavailable_maps_to_unavailable() {
        let player = player_json(json!({
            "playabilityStatus": {
                "status": "UNPLAYABLE",
                "reason": "This video is unavailable"
            }
        }));

        let reference = VideoReference::new("dQw4w9WgXcQ");
        let err = build_metadata(&reference, player).unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn formats_without_url_are_dropped() {
        let player = player_json(json!({
            "playabilityStatus": { "status": "OK" },
            "videoDetails": { "videoId": "dQw4w9WgXcQ", "title": "t" },
            "streamingData": {
                "formats": [{
                    "itag": 22,
                    "mimeType": "video/mp4",
                    "qualityLabel": "720p"
                }]
            }
        }));

        let reference = VideoReference::new("dQw4w9WgXcQ");
        let metadata = build_metadata(&reference, player).unwrap();
        assert!(metadata.formats.is_empty());
    }

    #[test]
    fn recognizes_checks_identifier_shape() {
        let provider = InnerTubeProvider::new(&ProviderConfig::default()).unwrap();
        assert!(provider.recognizes(&VideoReference::new("dQw4w9WgXcQ")));
        assert!(!provider.recognizes(&VideoReference::new("short")));
        assert!(!provider.recognizes(&VideoReference::new("has spaces!!")));
    }
}
