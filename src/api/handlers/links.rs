//! # Link Handlers
//!
//! ساخت و حذف لینک (نیاز به ورود)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::ValidatedJson,
    error::Result,
    models::{ApiResponse, CreateLinkRequest, CurrentUser},
    services::AppState,
};

// =====================================
// Create Link
// =====================================
/// ساخت لینک کوتاه جدید
///
/// # Endpoint
/// `POST /api/links`
///
/// # Request Body
/// ```json
/// {
///   "target_url": "example.com/some/long/path",
///   "slug": "mylink"
/// }
/// ```
///
/// `slug` اختیاریه؛ اگه نباشه یا خالی باشه slug تصادفی ساخته میشه.
///
/// # Response
/// - 201 با لینک ساخته شده
/// - 409 اگه slug سفارشی گرفته شده باشه (`details` شامل slug و URL ورودی)
pub async fn create_link(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateLinkRequest>,
) -> Result<impl IntoResponse> {
    let link = state.link_service.create_link(&user, request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

// =====================================
// Delete Link
// =====================================
/// حذف لینک
///
/// همیشه 204 برمیگردونه؛ حذف لینکی که مال caller نیست بی‌اثره.
///
/// # Endpoint
/// `DELETE /api/links/:id`
pub async fn delete_link(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(link_id): Path<i64>,
) -> Result<StatusCode> {
    state.link_service.delete_link(&user, link_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
