//! # Auth Handlers
//!
//! ثبت‌نام، ورود و خروج. توکن سشن هم در بدنه و هم در cookie
//! `access_token` (HttpOnly) برمیگرده.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

use crate::{
    api::extractors::{ValidatedJson, SESSION_COOKIE},
    error::Result,
    models::{ApiResponse, EmptyResponse, LoginRequest, RegisterRequest},
    services::AppState,
};

// =====================================
// Register
// =====================================
/// ثبت‌نام کاربر جدید
///
/// اولین کاربر سیستم admin میشه.
///
/// # Endpoint
/// `POST /api/auth/register`
///
/// # Request Body
/// ```json
/// {
///   "username": "alice",
///   "password": "securepassword"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user).with_message("Registration successful")),
    ))
}

// =====================================
// Login
// =====================================
/// ورود کاربر
///
/// # Endpoint
/// `POST /api/auth/login`
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { ... },
///     "token": "eyJ...",
///     "expires_at": "2024-..."
///   }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let response = state.auth_service.login(request).await?;

    let cookie = Cookie::build((SESSION_COOKIE, response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(ApiResponse::success(response))))
}

// =====================================
// Logout
// =====================================
/// خروج: پاک کردن cookie سشن
///
/// # Endpoint
/// `POST /api/auth/logout`
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(EmptyResponse::ok("Logged out")))
}
