//! # Dashboard Handler

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::Result,
    models::{ApiResponse, CurrentUser, DashboardQuery, DashboardResponse},
    services::AppState,
};

/// داشبورد کاربر
///
/// کاربر عادی فقط لینک‌های خودش رو میبینه. ادمین همه لینک‌ها رو میبینه و
/// میتونه با `filter_user` (نام کاربری دقیق) و `filter_date` (`YYYY-MM-DD`)
/// محدودشون کنه.
///
/// # Endpoint
/// `GET /api/dashboard?filter_user=alice&filter_date=2024-01-01`
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardResponse>>> {
    let response = state.link_service.dashboard(&user, query).await?;

    Ok(Json(ApiResponse::success(response)))
}
