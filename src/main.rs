//! # Link Shortener - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی: `.env` ← لاگ ← تنظیمات ← دیتابیس ← migration ← سرور.

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use link_shortener::{
    api::create_router,
    config::{Config, Environment},
    database::Database,
    error::{AppError, Result},
};

/// نقطه ورود اصلی برنامه
///
/// # Errors
/// خطا برمیگردونه اگه:
/// - تنظیمات لود یا اعتبارسنجی نشن
/// - دیتابیس متصل نشه
/// - سرور استارت نشه
#[tokio::main]
async fn main() -> Result<()> {
    // اگه فایل .env نباشه اوکیه
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.environment);

    info!(environment = ?config.environment, "Starting link shortener");

    config.validate()?;
    if config.jwt_secret == link_shortener::config::DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set JWT_SECRET before deploying");
    }

    let database = Database::connect(&config.database_url).await?;
    database.migrate().await?;
    info!("Database ready");

    let addr = config.server_addr();
    let app = create_router(database.clone(), config);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    database.close().await;
    info!("Server stopped");

    Ok(())
}

/// راه‌اندازی سیستم tracing
///
/// `RUST_LOG` اولویت داره. در production خروجی JSON و در بقیه محیط‌ها pretty.
fn init_tracing(environment: Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("link_shortener=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .init();
    }
}

/// صبر برای Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received");
}
