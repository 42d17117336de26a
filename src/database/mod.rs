//! # ماژول دیتابیس (Database Layer)
//!
//! لایه ارتباط با SQLite: connection pool و migration.
//!
//! ## مفاهیم Rust:
//! - **Arc<T>**: اشتراک pool بین handler‌ها بدون کپی
//! - **async/await**: همه عملیات‌ها غیرهمزمان هستن
//! - **Builder Pattern**: `SqliteConnectOptions` و `SqlitePoolOptions`
//!
//! ## همزمانی
//! دیتابیس در حالت WAL باز میشه و `busy_timeout` داره؛ نویسنده‌های همزمان
//! پشت سر هم اجرا میشن به جای اینکه با `SQLITE_BUSY` fail بشن.

mod repository;

pub use repository::*;

use std::{str::FromStr, sync::Arc, time::Duration};

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::error::Result;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// حداکثر زمان انتظار برای lock نوشتن
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// =====================================
// Database Connection
// =====================================
/// اتصال به دیتابیس با Connection Pool
///
/// Clone ارزونه: فقط شمارنده `Arc` زیاد میشه.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// اتصال به دیتابیس
    ///
    /// # Arguments
    /// * `database_url` - آدرس دیتابیس (مثلا `sqlite://data/app.db?mode=rwc`)
    ///
    /// # Errors
    /// خطا برمیگردونه اگه آدرس نامعتبر باشه یا اتصال موفق نباشه
    pub async fn connect(database_url: impl AsRef<str>) -> Result<Self> {
        let url = database_url.as_ref();
        ensure_parent_dir(url)?;

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(options)
            .await?;

        info!(database_url = %url, "Database pool ready");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// دیتابیس in-memory با schema کامل (برای تست و اجرای موقت)
    ///
    /// فقط یک اتصال نگه میداره چون هر اتصال `:memory:` دیتابیس جدای خودش رو داره.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اتصال یا migration موفق نباشه
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.migrate().await?;
        Ok(db)
    }

    /// اجرای migration‌ها
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&*self.pool).await?;
        debug!("Migrations applied");
        Ok(())
    }

    /// دسترسی به pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// بررسی سلامت دیتابیس
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    /// بستن همه اتصال‌ها (موقع shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// ساخت پوشه والد فایل دیتابیس اگه وجود نداره
fn ensure_parent_dir(url: &str) -> Result<()> {
    let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_is_migrated() {
        let db = Database::in_memory().await.unwrap();
        db.health_check().await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM links")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_connect_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.db");
        let url = format!("sqlite://{}", path.display());

        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();

        assert!(path.exists());
        db.close().await;
    }
}
