//! # Link Shortener Library
//!
//! کوتاه‌کننده لینک با slug یکتا، شمارنده کلیک اتمی و مالکیت لینک‌ها.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs          # نقطه ورود کتابخانه
//! ├── main.rs         # نقطه ورود باینری
//! ├── config/         # مدیریت تنظیمات
//! ├── error/          # تعریف خطاها
//! ├── database/       # Link Store و User Store
//! ├── models/         # مدل‌های داده
//! ├── services/       # Slug Allocator، Redirect Resolver، احراز هویت
//! ├── api/            # لایه HTTP (axum)
//! └── utils/          # تولید slug، نرمالایز URL، فیلتر تاریخ
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use link_shortener::{config::Config, database::Database};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     let db = Database::connect(&config.database_url).await.unwrap();
//!     db.migrate().await.unwrap();
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

pub use error::{AppError, Result};

// =====================================
// Prelude Module
// =====================================
/// آیتم‌های پرکاربرد برای import راحت‌تر
///
/// ```rust
/// use link_shortener::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::Database;
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::services::*;
}
