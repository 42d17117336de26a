//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- LinkService, AuthService
//! ├─────────────────┤
//! │ Repository Layer│  <-- LinkRepository, UserRepository
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```

mod auth_service;
mod link_service;

pub use auth_service::*;
pub use link_service::*;

use std::sync::Arc;

use crate::{
    config::Config,
    database::{Database, LinkRepository, UserRepository},
};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// Clone فقط `Arc`‌ها رو کپی میکنه، نه داده رو.
#[derive(Clone)]
pub struct AppState {
    /// تنظیمات برنامه
    pub config: Arc<Config>,

    /// دیتابیس (برای health check)
    pub db: Database,

    /// سرویس لینک
    pub link_service: Arc<LinkService>,

    /// سرویس احراز هویت
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// ساخت AppState با همه وابستگی‌ها
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        let config = Arc::new(config);
        let link_service = LinkService::new(
            LinkRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            config.clone(),
        );

        Self::with_link_service(db, config, link_service)
    }

    /// ساخت AppState با یک `LinkService` آماده (مثلا با generator سفارشی)
    #[must_use]
    pub fn with_link_service(db: Database, config: Arc<Config>, link_service: LinkService) -> Self {
        let auth_service = AuthService::new(UserRepository::new(db.clone()), config.clone());

        Self {
            config,
            db,
            link_service: Arc::new(link_service),
            auth_service: Arc::new(auth_service),
        }
    }
}

// =====================================
// Service Trait
// =====================================
/// Marker trait برای services؛ همه باید Send + Sync باشن
pub trait Service: Send + Sync {}
