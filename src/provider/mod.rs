//! Collaborator seam for the video platform integration.
//!
//! The gateway treats the platform as an opaque collaborator behind
//! [`VideoProvider`]: it hands over a validated [`VideoReference`] and gets
//! back either request-scoped metadata or an open byte stream. Everything
//! platform-specific (player negotiation, signed URLs) lives behind this
//! trait; the production implementation is [`InnerTubeProvider`].

mod innertube;

pub use innertube::InnerTubeProvider;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

/// Byte stream relayed from the collaborator to the HTTP response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("video unavailable: {0}")]
    Unavailable(String),
    #[error("upstream rate limit")]
    RateLimited,
    #[error("request failed: {0}")]
    Request(String),
    #[error("malformed player response: {0}")]
    Malformed(String),
}

/// A validated platform video identifier plus its canonical URL form.
///
/// Constructed only by the URL validator; immutable and scoped to one
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub id: String,
    pub canonical_url: String,
}

impl VideoReference {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let canonical_url = format!("https://www.youtube.com/watch?v={id}");
        Self { id, canonical_url }
    }
}

/// One downloadable or playable stream variant of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDescriptor {
    pub itag: u32,
    pub quality: Option<String>,
    /// Media MIME type without codec parameters, e.g. `video/mp4`.
    pub media_type: String,
    pub container: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
    pub bitrate: Option<u64>,
    pub content_length: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Read-only video metadata produced by one collaborator call.
///
/// Availability policy (private, live) is carried as flags rather than
/// provider errors so the fetch path applies it uniformly.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    /// Collaborator order preserved; the last entry is the highest
    /// resolution.
    pub thumbnails: Vec<Thumbnail>,
    pub duration_seconds: u64,
    pub view_count: u64,
    pub author: Option<String>,
    pub is_private: bool,
    pub is_live: bool,
    /// Filtered to variants carrying video or audio and a usable source URL.
    pub formats: Vec<FormatDescriptor>,
}

#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// The collaborator's own validation predicate for an extracted
    /// identifier.
    fn recognizes(&self, reference: &VideoReference) -> bool;

    /// Retrieve metadata and the available stream variants. One outbound
    /// network call, no retries.
    async fn fetch_metadata(
        &self,
        reference: &VideoReference,
    ) -> Result<VideoMetadata, ProviderError>;

    /// Open the byte stream for a previously selected format.
    async fn open_stream(&self, format: &FormatDescriptor) -> Result<ByteStream, ProviderError>;
}
