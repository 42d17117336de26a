//! # Redirect Handlers

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{
    error::{AppError, Result},
    services::AppState,
};

/// Redirect به مقصد لینک
///
/// کلیک قبل از ساخت response شمرده و commit میشه.
///
/// # Endpoint
/// `GET /:slug`
///
/// # Response
/// - 307 Temporary Redirect با header `Location`
/// - 404 اگه slug وجود نداشته باشه
pub async fn follow_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response> {
    let resolution = state.link_service.resolve(&slug).await?;

    info!(slug = %slug, clicks = resolution.click_count, "Redirecting");

    // URL مقصد اعتبارسنجی نشده؛ `Redirect::temporary` روی کاراکتر کنترلی panic میکنه
    let location = HeaderValue::from_bytes(resolution.target_url.as_bytes())
        .map_err(|e| AppError::Internal(format!("Unusable redirect target: {e}")))?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// صفحه اصلی به داشبورد میره
///
/// # Endpoint
/// `GET /`
pub async fn root() -> Redirect {
    Redirect::temporary("/api/dashboard")
}
