use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;

/// Request-boundary error taxonomy. Every failure a handler can produce is
/// one of these kinds; nothing propagates past the handler uncaught.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("URL parameter is required")]
    MissingUrl,
    #[error("URL and itag parameters are required")]
    MissingParams,
    #[error("Invalid YouTube URL")]
    InvalidUrl,
    #[error("Video identifier rejected")]
    InvalidVideo,
    #[error("This video is private")]
    PrivateVideo,
    #[error("Live streams cannot be downloaded")]
    LiveStream,
    #[error("Video is unavailable")]
    VideoUnavailable,
    #[error("Upstream rate limit reached")]
    UpstreamRateLimited,
    #[error("Requested format not available")]
    FormatUnavailable,
    #[error("Failed to open the download stream")]
    StreamError { detail: Option<String> },
    #[error("Download failed")]
    DownloadFailed { detail: Option<String> },
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, detail: Option<String>) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl
            | ApiError::MissingParams
            | ApiError::InvalidUrl
            | ApiError::InvalidVideo
            | ApiError::LiveStream
            | ApiError::FormatUnavailable => StatusCode::BAD_REQUEST,
            ApiError::PrivateVideo => StatusCode::FORBIDDEN,
            ApiError::VideoUnavailable | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::StreamError { .. }
            | ApiError::DownloadFailed { .. }
            | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingUrl => "MISSING_URL",
            ApiError::MissingParams => "MISSING_PARAMS",
            ApiError::InvalidUrl => "INVALID_URL",
            ApiError::InvalidVideo => "INVALID_VIDEO",
            ApiError::PrivateVideo => "PRIVATE_VIDEO",
            ApiError::LiveStream => "LIVE_STREAM",
            ApiError::VideoUnavailable => "VIDEO_UNAVAILABLE",
            ApiError::UpstreamRateLimited => "RATE_LIMITED",
            ApiError::FormatUnavailable => "FORMAT_UNAVAILABLE",
            ApiError::StreamError { .. } => "STREAM_ERROR",
            ApiError::DownloadFailed { .. } => "DOWNLOAD_FAILED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal { .. } => "SERVER_ERROR",
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidUrl => {
                Some("Provide a standard watch, share, embed, or shorts URL")
            }
            ApiError::PrivateVideo => Some("Only public videos can be downloaded"),
            ApiError::UpstreamRateLimited => Some("Wait a while before retrying"),
            ApiError::FormatUnavailable => {
                Some("Request /api/info to list the available formats")
            }
            _ => None,
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::StreamError { detail }
            | ApiError::DownloadFailed { detail }
            | ApiError::Internal { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: "error",
            code: self.code(),
            message: self.to_string(),
            suggestion: self.suggestion(),
            details: self.detail().map(str::to_owned),
        };

        (status, Json(body)).into_response()
    }
}
