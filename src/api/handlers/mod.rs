//! # HTTP Handlers
//!
//! هر handler یک async function هست که با extractor‌ها ورودی میگیره
//! و کار اصلی رو به سرویس‌ها میسپاره.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod links;
pub mod redirect;
