//! # Data Transfer Objects (DTOs)
//!
//! DTO‌های عمومی که در API استفاده میشن

use serde::{Deserialize, Serialize};

use super::{LinkResponse, UserResponse};

// =====================================
// Generic API Responses
// =====================================
/// پاسخ موفق عمومی
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// ساخت پاسخ موفق
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// اضافه کردن پیام
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// پاسخ خالی برای عملیات‌هایی که داده برنمیگردونن
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResponse {
    pub success: bool,
    pub message: String,
}

impl EmptyResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =====================================
// Health Check
// =====================================
/// پاسخ health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy(database_ok: bool) -> Self {
        Self {
            status: if database_ok { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database_ok,
        }
    }
}

// =====================================
// Dashboard
// =====================================
/// پارامترهای query داشبورد (فقط برای ادمین اعمال میشن)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub filter_user: Option<String>,

    /// `YYYY-MM-DD`
    #[serde(default)]
    pub filter_date: Option<String>,
}

/// محتوای داشبورد
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: super::CurrentUser,
    pub links: Vec<LinkResponse>,

    /// لیست کاربرها برای dropdown فیلتر؛ برای غیر ادمین خالیه
    pub all_users: Vec<UserResponse>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_date: Option<String>,
}
