//! # Custom Extractors
//!
//! ## چطور کار میکنه؟
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.
//!
//! - `SessionToken`: توکن خام از cookie یا header
//! - `CurrentUser`: هویت کامل کاربر (توکن verify شده + `is_admin` از دیتابیس)
//! - `ValidatedJson<T>`: بدنه JSON با اعتبارسنجی `validator`

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    error::AppError,
    models::CurrentUser,
    services::{extract_token_from_header, AppState},
};

/// نام cookie سشن
pub const SESSION_COOKIE: &str = "access_token";

// =====================================
// Session Token Extractor
// =====================================
/// توکن سشن
///
/// اول cookie `access_token` (مرورگر) و بعد `Authorization: Bearer` (API).
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if !cookie.value().is_empty() {
                return Ok(SessionToken(cookie.value().to_string()));
            }
        }

        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_token_from_header)
            .map(|token| SessionToken(token.to_string()))
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
    }
}

// =====================================
// Current User Extractor
// =====================================
/// کاربر احراز هویت شده
///
/// اگه توکن نباشه، نامعتبر باشه یا کاربرش حذف شده باشه، 401 برمیگرده.
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(user: CurrentUser) -> ... {
///     if user.is_admin { ... }
/// }
/// ```
#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;

        state.auth_service.current_user(&token).await
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// - JSON خراب: 400
/// - اعتبارسنجی ناموفق: 422
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(format!("Invalid JSON: {}", e)))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
