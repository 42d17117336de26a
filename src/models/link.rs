//! # مدل لینک
//!
//! Entity و DTO‌های مربوط به لینک کوتاه

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::utils;

// =====================================
// Link Entity
// =====================================
/// Entity اصلی لینک
///
/// - `slug` در کل جدول یکتاست و بعد از ساخت تغییر نمیکنه
/// - `click_count` فقط توسط resolver و فقط رو به بالا تغییر میکنه
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    /// شناسه‌ای که دیتابیس میده
    pub id: i64,

    /// کد کوتاه (مثلا "abc123")
    pub slug: String,

    /// آدرس مقصد (نرمالایز شده)
    pub target_url: String,

    /// شناسه کاربر مالک
    pub owner_id: i64,

    /// تعداد کلیک
    pub click_count: i64,

    /// تاریخ ایجاد
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// گرفتن لینک کوتاه کامل
    #[must_use]
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.slug)
    }
}

// =====================================
// New Link (داخلی)
// =====================================
/// داده برای insert لینک جدید
///
/// این DTO برای ارسال به Repository استفاده میشه
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub target_url: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

// =====================================
// Link Builder
// =====================================
/// Builder برای ساخت `NewLink`
///
/// URL مقصد همینجا نرمالایز میشه تا هیچ مسیری نتونه URL خام ذخیره کنه.
///
/// # مثال
/// ```rust
/// use link_shortener::models::LinkBuilder;
///
/// let link = LinkBuilder::new("example.com", 1).slug("abc123").build().unwrap();
/// assert_eq!(link.target_url, "https://example.com");
/// ```
#[derive(Debug)]
pub struct LinkBuilder {
    target_url: String,
    owner_id: i64,
    slug: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl LinkBuilder {
    /// شروع builder با URL مقصد و مالک
    #[must_use]
    pub fn new(target_url: impl AsRef<str>, owner_id: i64) -> Self {
        Self {
            target_url: utils::normalize_target_url(target_url.as_ref()),
            owner_id,
            slug: None,
            created_at: None,
        }
    }

    /// تنظیم slug
    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// تنظیم زمان ساخت؛ پیش‌فرض `Utc::now()`
    #[must_use]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// ساخت NewLink
    ///
    /// # Errors
    /// اگه slug تنظیم نشده باشه `BadRequest` برمیگردونه
    pub fn build(self) -> crate::error::Result<NewLink> {
        let slug = self.slug.ok_or_else(|| {
            crate::error::AppError::BadRequest("Slug is required".to_string())
        })?;

        Ok(NewLink {
            slug,
            target_url: self.target_url,
            owner_id: self.owner_id,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

// =====================================
// Filters
// =====================================
/// فیلترهای لیست ادمین
///
/// هر دو فیلتر اختیاری هستن و با AND ترکیب میشن.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    /// فقط لینک‌های این کاربر (تطابق دقیق)
    pub username: Option<String>,

    /// بازه `[from, until)` روی `created_at`
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl LinkFilter {
    /// ساخت فیلتر از query string داشبورد
    ///
    /// رشته خالی یعنی فیلتر نداریم. تاریخ خراب بی‌صدا نادیده گرفته میشه.
    #[must_use]
    pub fn from_query(filter_user: Option<&str>, filter_date: Option<&str>) -> Self {
        let username = filter_user
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        let created_between = filter_date
            .filter(|s| !s.trim().is_empty())
            .and_then(|value| {
                let range = utils::parse_day_range(value);
                if range.is_none() {
                    tracing::debug!(filter_date = %value, "Ignoring malformed date filter");
                }
                range
            });

        Self { username, created_between }
    }

    /// آیا هیچ فیلتری فعال نیست؟
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.created_between.is_none()
    }
}

// =====================================
// API Request DTOs
// =====================================
/// درخواست ساخت لینک کوتاه
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// آدرس مقصد (آزاد، بدون اعتبارسنجی فرمت)
    #[validate(length(min = 1, message = "Target URL is required"))]
    pub target_url: String,

    /// slug سفارشی (اختیاری، trim میشه)
    #[serde(default)]
    pub slug: Option<String>,
}

// =====================================
// API Response DTOs
// =====================================
/// پاسخ لینک
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub short_url: String,
    pub target_url: String,
    pub owner_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    /// تبدیل از Link entity
    #[must_use]
    pub fn from_link(link: &Link, base_url: &str) -> Self {
        Self {
            id: link.id,
            slug: link.slug.clone(),
            short_url: link.short_url(base_url),
            target_url: link.target_url.clone(),
            owner_id: link.owner_id,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// نتیجه resolve شدن یک slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Resolution {
    pub target_url: String,
    /// مقدار شمارنده بعد از همین کلیک
    pub click_count: i64,
}
