//! Handlers for link shortening endpoints.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{
    BatchShortenRequest, BatchShortenResponse, BatchSummary, ShortenRequest, ShortenResponse,
    ShortenResultItem,
};
use crate::domain::entities::ShortLinkInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/some/long/path",
///   "validityMinutes": 45,
///   "customCode": "spring-sale"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "code": "spring-sale",
///   "shortUrl": "https://s.example.com/spring-sale",
///   "targetUrl": "https://example.com/some/long/path",
///   "createdAt": "2026-03-01T10:00:00Z",
///   "expiresAt": "2026-03-01T10:45:00Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url`, `invalid_code` or `validation_error`
/// - 409 `code_taken` if the custom code is held by another link
/// - 503 `allocation_exhausted` if no free generated code was found
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let info = process_single_url(&state, payload).await?;

    Ok(Json(info.into()))
}

/// Creates short links for up to five URLs.
///
/// # Endpoint
///
/// `POST /shorten/batch`
///
/// # Batch Processing
///
/// Processes URLs independently. If one fails, others continue processing.
/// Each result includes either success data or error information.
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 2, "successful": 1, "failed": 1 },
///   "items": [
///     {
///       "targetUrl": "https://example.com",
///       "code": "k3x9qa",
///       "shortUrl": "https://s.example.com/k3x9qa",
///       "expiresAt": "2026-03-01T10:30:00Z"
///     },
///     {
///       "targetUrl": "notaurl",
///       "error": { "code": "invalid_url", "message": "Invalid URL format", "details": {} }
///     }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the batch is empty, larger than five, or an
/// item fails shape validation.
pub async fn batch_shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<BatchShortenRequest>,
) -> Result<Json<BatchShortenResponse>, AppError> {
    payload.validate()?;

    let total = payload.urls.len();
    let mut results = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for item in payload.urls {
        let target_url = item.target_url.clone();

        match process_single_url(&state, item).await {
            Ok(info) => {
                successful += 1;
                results.push(ShortenResultItem::Success {
                    target_url,
                    code: info.code,
                    short_url: info.short_url,
                    expires_at: info.expires_at,
                });
            }
            Err(err) => {
                failed += 1;
                results.push(ShortenResultItem::Error {
                    target_url,
                    error: err.to_error_info(),
                });
            }
        }
    }

    Ok(Json(BatchShortenResponse {
        summary: BatchSummary {
            total,
            successful,
            failed,
        },
        items: results,
    }))
}

/// Processes a single URL shortening request.
async fn process_single_url(
    state: &AppState,
    item: ShortenRequest,
) -> Result<ShortLinkInfo, AppError> {
    let custom_code = item.custom_code();

    state
        .resolver
        .shorten(&item.target_url, item.validity_minutes, custom_code)
        .await
}
