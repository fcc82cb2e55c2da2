use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::media::models::RangeRequest;
use crate::features::media::services::MediaService;
use crate::shared::constants::DEFAULT_CONTENT_TYPE;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Serve a hosted upload to the fax provider.
///
/// Public on purpose: the unguessable token in the path is the only
/// credential. Unknown, expired and out-of-directory tokens all answer 404.
/// Single byte ranges are honoured; durable uploads also answer
/// conditional requests.
pub async fn serve_media(
    State(service): State<Arc<MediaService>>,
    Path(token): Path<String>,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let media = service.retrieve(&token).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&media.content_type)
            .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(if media.ephemeral {
            "no-store"
        } else {
            "private, max-age=0"
        }),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    if let Some(modified) = media.modified {
        if let Ok(value) = HeaderValue::from_str(&modified.format(HTTP_DATE_FORMAT).to_string()) {
            headers.insert(header::LAST_MODIFIED, value);
        }
        if unmodified_since_request(&request_headers, modified) {
            return Ok((StatusCode::NOT_MODIFIED, headers).into_response());
        }
    }

    let range = if if_range_matches(&request_headers, media.modified) {
        RangeRequest::parse(
            request_headers
                .get(header::RANGE)
                .and_then(|v| v.to_str().ok()),
            media.size,
        )
    } else {
        RangeRequest::Full
    };

    let size = media.size;
    match range {
        RangeRequest::Full => {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
            Ok((StatusCode::OK, headers, media.into_body()).into_response())
        }
        RangeRequest::Partial(range) => {
            tracing::debug!(
                start = range.start,
                end = range.end,
                size,
                "Serving partial media content"
            );
            headers.insert(
                header::CONTENT_RANGE,
                HeaderValue::from_str(&range.content_range(size))
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            );
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(range.length()));
            let body = media
                .into_range_body(range)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to read media: {}", e)))?;
            Ok((StatusCode::PARTIAL_CONTENT, headers, body).into_response())
        }
        RangeRequest::Unsatisfiable => {
            headers.insert(
                header::CONTENT_RANGE,
                HeaderValue::from_str(&format!("bytes */{}", size))
                    .map_err(|e| AppError::Internal(e.to_string()))?,
            );
            Ok((StatusCode::RANGE_NOT_SATISFIABLE, headers).into_response())
        }
    }
}

fn header_date(headers: &HeaderMap, name: header::HeaderName) -> Option<DateTime<Utc>> {
    let value = headers.get(name)?.to_str().ok()?;
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// `If-Modified-Since` is at or after the file's modification time
fn unmodified_since_request(headers: &HeaderMap, modified: DateTime<Utc>) -> bool {
    header_date(headers, header::IF_MODIFIED_SINCE)
        .is_some_and(|since| modified.timestamp() <= since.timestamp())
}

/// A `Range` only applies when `If-Range` is absent or names the current version
fn if_range_matches(headers: &HeaderMap, modified: Option<DateTime<Utc>>) -> bool {
    if !headers.contains_key(header::IF_RANGE) {
        return true;
    }
    match (header_date(headers, header::IF_RANGE), modified) {
        (Some(date), Some(modified)) => modified.timestamp() <= date.timestamp(),
        _ => false,
    }
}
