//! Pure helpers for format selection and download naming.
//!
//! Stateless functions extracted from the request handlers so they can be
//! unit tested without a provider.

use super::error::ApiError;
use super::models::MediaKind;
use crate::provider::{FormatDescriptor, VideoMetadata};

/// Canonical audio-only variant: 128 kbps AAC in an mp4 container. Audio
/// downloads prefer this tag when the video offers it, reconciling the
/// caller's tag choice with the conventional "highest audio" policy.
pub const DEFAULT_AUDIO_ITAG: u32 = 140;

const DEFAULT_CONTAINER: &str = "mp4";

/// Resolve a requested tag and media kind to a concrete stream descriptor.
pub fn select_format(
    metadata: &VideoMetadata,
    itag: u32,
    kind: MediaKind,
) -> Result<&FormatDescriptor, ApiError> {
    let matched = metadata
        .formats
        .iter()
        .find(|f| f.itag == itag)
        .ok_or(ApiError::FormatUnavailable)?;

    match kind {
        MediaKind::Audio => Ok(metadata
            .formats
            .iter()
            .find(|f| f.itag == DEFAULT_AUDIO_ITAG)
            .unwrap_or(matched)),
        MediaKind::Video => Ok(matched),
    }
}

/// Derive the attachment filename: the title stripped to alphanumerics,
/// whitespace and underscores, suffixed `.mp3` for audio or the format's
/// container for video.
pub fn derive_filename(title: &str, kind: MediaKind, format: &FormatDescriptor) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    match kind {
        MediaKind::Audio => format!("{stem}.mp3"),
        MediaKind::Video => {
            let container = format.container.as_deref().unwrap_or(DEFAULT_CONTAINER);
            format!("{stem}.{container}")
        }
    }
}
