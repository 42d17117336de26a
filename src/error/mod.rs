//! # ماژول مدیریت خطاها (Error Handling)
//!
//! همه خطاهای برنامه اینجا تعریف میشن. هیچ‌کدوم برای process کشنده نیستن،
//! همه در سطح یک request مدیریت میشن.
//!
//! ## خطاهای دامنه:
//! - `SlugConflict`: slug سفارشی قبلا گرفته شده (409، با URL اصلی کاربر)
//! - `LinkNotFound`: slug ناشناخته در redirect (404)
//! - `UniqueViolation`: نقض یکتایی در لایه دیتابیس؛ allocator خودش بازیابیش میکنه

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

// =====================================
// Result Type Alias
// =====================================
/// نوع Result سفارشی برنامه
///
/// به جای نوشتن `Result<Link, AppError>` میتونیم بنویسیم `Result<Link>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای دامنه لینک
    // ----------------------------------------

    /// slug سفارشی تکراریه - 409
    ///
    /// `target_url` همون ورودی کاربره (قبل از نرمالایز) تا کلاینت
    /// بتونه فرم رو بدون از دست رفتن داده دوباره نشون بده.
    #[error("Slug '{slug}' is already taken")]
    SlugConflict { slug: String, target_url: String },

    /// لینک با این slug وجود نداره - 404
    #[error("Link '{0}' not found")]
    LinkNotFound(String),

    /// نقض UNIQUE constraint در دیتابیس
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست نامعتبر - 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// احراز هویت نشده - 401
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// تکراری - 409
    #[error("Conflict: {0}")]
    Conflict(String),

    /// خطای اعتبارسنجی - 422
    #[error("Validation error: {0}")]
    Validation(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای سرور
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// خطای migration
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای JWT
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// خطای لود تنظیمات
    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::LinkNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::SlugConflict { .. } | Self::UniqueViolation(_) => {
                StatusCode::CONFLICT
            }
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,

            // 5xx Server Errors
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Migration(_)
            | Self::Io(_)
            | Self::Jwt(_)
            | Self::ConfigLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// ساخت خطای SlugConflict
    #[must_use]
    pub fn slug_conflict(slug: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self::SlugConflict {
            slug: slug.into(),
            target_url: target_url.into(),
        }
    }

    /// جزئیات ماشینی خطا برای بدنه پاسخ (فقط بعضی variant‌ها)
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::SlugConflict { slug, target_url } => Some(serde_json::json!({
                "slug": slug,
                "target_url": target_url,
            })),
            Self::LinkNotFound(slug) => Some(serde_json::json!({ "slug": slug })),
            _ => None,
        }
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// کد خطا (مثلا "Conflict")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// جزئیات اضافی (اختیاری)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
            details: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }

    /// اضافه کردن جزئیات
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// این باعث میشه بتونیم AppError رو مستقیم از handler برگردونیم.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // لاگ کردن خطاهای سرور
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();

        let mut error_response = ErrorResponse::new(
            status.canonical_reason().unwrap_or("Error"),
            self.to_string(),
        )
        .with_status(status);

        if let Some(details) = self.details() {
            error_response = error_response.with_details(details);
        }

        (status, Json(error_response)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

// =====================================
// Result Extensions
// =====================================
/// Extension trait برای Result
pub trait ResultExt<T> {
    /// تبدیل خطا به AppError::Internal
    fn map_internal(self) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn map_internal(self) -> Result<T> {
        self.map_err(|e| AppError::Internal(e.to_string()))
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::LinkNotFound("xyz000".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );

        assert_eq!(
            AppError::slug_conflict("abc123", "example.com").status_code(),
            StatusCode::CONFLICT
        );

        assert_eq!(
            AppError::Validation("bad".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        assert_eq!(
            AppError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_slug_conflict_keeps_user_input() {
        let err = AppError::slug_conflict("abc123", "example.com");
        let details = err.details().expect("conflict carries details");

        assert_eq!(details["slug"], "abc123");
        assert_eq!(details["target_url"], "example.com");
        assert_eq!(err.to_string(), "Slug 'abc123' is already taken");
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("Not Found", "Link 'x' not found")
            .with_status(StatusCode::NOT_FOUND);

        assert_eq!(response.status_code, Some(404));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_result_extension() {
        let ok: std::result::Result<i32, &str> = Ok(42);
        let err: std::result::Result<i32, &str> = Err("original error");

        assert!(ok.map_internal().is_ok());
        assert!(matches!(err.map_internal(), Err(AppError::Internal(_))));
    }
}
