//! # لایه API
//!
//! HTTP handlers و routing.
//!
//! ## ساختار URL‌ها:
//! - `GET /` - Redirect به داشبورد
//! - `GET /health` - Health check
//! - `POST /api/auth/register` - ثبت‌نام
//! - `POST /api/auth/login` - ورود (cookie + توکن)
//! - `POST /api/auth/logout` - خروج
//! - `GET /api/dashboard` - داشبورد (فیلترهای ادمین در query)
//! - `POST /api/links` - ساخت لینک کوتاه
//! - `DELETE /api/links/:id` - حذف لینک
//! - `GET /:slug` - Redirect به مقصد

mod extractors;
mod handlers;
mod middleware;

pub use extractors::*;
pub use handlers::*;
pub use middleware::*;

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, database::Database, services::AppState};

/// حداکثر زمان پردازش هر request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # Arguments
/// * `db` - اتصال دیتابیس
/// * `config` - تنظیمات برنامه
pub fn create_router(db: Database, config: Config) -> Router {
    router_with_state(AppState::new(db, config))
}

/// ساخت Router با یک `AppState` آماده
pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::redirect::root))
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes())
        // Route redirect آخر از همه؛ مسیرهای ثابت بالا اولویت دارن
        .route("/:slug", get(handlers::redirect::follow_link))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::request_timing))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/links", post(handlers::links::create_link))
        .route("/links/:id", delete(handlers::links::delete_link))
}

/// Route‌های احراز هویت
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
}
