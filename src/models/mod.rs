//! # ماژول مدل‌ها (Domain Models)
//!
//! ## تفاوت انواع مدل:
//! - **Entity**: داده‌ای که در دیتابیس ذخیره میشه (`Link`, `User`)
//! - **DTO (Data Transfer Object)**: برای ارسال/دریافت از API
//! - **Builder**: ساخت تدریجی ردیف جدید قبل از insert (`LinkBuilder`)

mod link;
mod user;
mod dto;

// Re-export همه مدل‌ها
pub use link::*;
pub use user::*;
pub use dto::*;
