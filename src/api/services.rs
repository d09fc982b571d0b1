use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use super::{
    error::ApiError,
    models::{DownloadParams, HealthResponse, InfoParams, VideoInfoResponse},
    state::AppState,
    utils::{derive_filename, select_format},
    validation,
};
use crate::provider::{ProviderError, VideoMetadata, VideoReference};

/// Video metadata endpoint (GET /api/info)
///
/// Validates the `url` query parameter, resolves it to a video reference,
/// fetches metadata from the collaborator under the configured timeout, and
/// maps it to the stable JSON contract.
///
/// ## Flow:
/// 1. Require a non-empty `url` parameter
/// 2. Extract the 11-character identifier via the pattern rules
/// 3. Confirm the collaborator accepts the identifier
/// 4. Fetch metadata (bounded, no retries) and apply availability policy
/// 5. Shape the response payload
pub async fn get_info(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<InfoParams>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    info_response(state, params)
        .await
        .inspect_err(|err| log_rejection(&uri, err))
}

async fn info_response(
    state: AppState,
    params: InfoParams,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    let raw_url = params
        .url
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let reference = resolve_reference(&state, &raw_url)?;
    let metadata = fetch_metadata(&state, &raw_url, &reference).await?;

    state.metrics.info_served();

    Ok(Json(VideoInfoResponse::from_metadata(&metadata)))
}

/// Download endpoint (GET /api/download)
///
/// Resolves `url`, `itag` and `type` to a concrete stream descriptor, opens
/// the collaborator's byte stream, and relays it with attachment headers.
/// Headers are written before any body bytes; an upstream failure after the
/// response has started can only terminate the connection.
pub async fn download(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    download_response(state, params)
        .await
        .inspect_err(|err| log_rejection(&uri, err))
}

async fn download_response(state: AppState, params: DownloadParams) -> Result<Response, ApiError> {
    let (raw_url, raw_itag) = match (
        params.url.filter(|url| !url.is_empty()),
        params.itag.filter(|itag| !itag.is_empty()),
    ) {
        (Some(url), Some(itag)) => (url, itag),
        _ => return Err(ApiError::MissingParams),
    };

    let reference = resolve_reference(&state, &raw_url)?;
    let metadata = fetch_metadata(&state, &raw_url, &reference).await?;

    // A non-numeric tag can never name a known format.
    let itag: u32 = raw_itag.parse().map_err(|_| ApiError::FormatUnavailable)?;
    let format = select_format(&metadata, itag, params.kind)?;
    let filename = derive_filename(&metadata.title, params.kind, format);

    state.metrics.download_started();

    let stream = match state.provider.open_stream(format).await {
        Ok(stream) => stream,
        Err(err) => {
            state.metrics.download_failed();
            error!(url = %raw_url, itag, error = %err, "Failed to open download stream");
            return Err(ApiError::StreamError {
                detail: expose_detail(&state, &err),
            });
        }
    };

    let content_type = format
        .media_type
        .parse::<mime::Mime>()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM);

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .body(Body::from_stream(stream))
        .map_err(|err| {
            state.metrics.download_failed();
            error!(url = %raw_url, error = %err, "Failed to build download response");
            ApiError::DownloadFailed {
                detail: expose_detail(&state, &err),
            }
        })
}

/// Health check endpoint (GET /health)
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unmatched paths under the /api namespace.
pub async fn api_not_found(uri: Uri) -> ApiError {
    let err = ApiError::NotFound(uri.path().to_string());
    log_rejection(&uri, &err);
    err
}

/// Every rejected request is logged with its URI and full message; the
/// client may see a redacted body, the log never is.
fn log_rejection(uri: &Uri, err: &ApiError) {
    error!(uri = %uri, code = err.code(), error = %err, "Request rejected");
}

fn resolve_reference(state: &AppState, raw_url: &str) -> Result<VideoReference, ApiError> {
    let reference = validation::extract_video_id(raw_url).ok_or(ApiError::InvalidUrl)?;

    // The collaborator gets the final say on the reconstructed identifier.
    if !state.provider.recognizes(&reference) {
        return Err(ApiError::InvalidVideo);
    }

    Ok(reference)
}

/// One bounded collaborator call followed by availability policy. The
/// underlying request future is dropped, and thereby cancelled, when the
/// timeout elapses.
async fn fetch_metadata(
    state: &AppState,
    raw_url: &str,
    reference: &VideoReference,
) -> Result<VideoMetadata, ApiError> {
    let timeout = Duration::from_secs(state.config.provider.metadata_timeout_secs);

    let metadata = match tokio::time::timeout(
        timeout,
        state.provider.fetch_metadata(reference),
    )
    .await
    {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(err)) => {
            error!(url = %raw_url, error = %err, "Metadata fetch failed");
            return Err(map_provider_error(state, err));
        }
        Err(_) => {
            error!(url = %raw_url, timeout_secs = timeout.as_secs(), "Metadata fetch timed out");
            return Err(ApiError::internal(
                "Timed out fetching video information",
                None,
            ));
        }
    };

    // Neither private nor live content is downloadable by contract.
    if metadata.is_private {
        return Err(ApiError::PrivateVideo);
    }
    if metadata.is_live {
        return Err(ApiError::LiveStream);
    }

    Ok(metadata)
}

fn map_provider_error(state: &AppState, err: ProviderError) -> ApiError {
    match err {
        ProviderError::Unavailable(_) => ApiError::VideoUnavailable,
        ProviderError::RateLimited => ApiError::UpstreamRateLimited,
        other => ApiError::internal(
            "Failed to fetch video information",
            expose_detail(state, &other),
        ),
    }
}

/// Internal error detail is echoed to clients only outside production.
fn expose_detail(state: &AppState, err: &dyn std::fmt::Display) -> Option<String> {
    state
        .config
        .expose_error_details()
        .then(|| err.to_string())
}
