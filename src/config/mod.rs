//! # ماژول تنظیمات (Configuration)
//!
//! این ماژول مسئول خوندن و مدیریت تنظیمات برنامه هست.
//!
//! ترتیب اولویت منابع:
//! 1. مقادیر پیش‌فرض (`Config::default()`)
//! 2. متغیرهای محیطی (`HOST`, `PORT`, `DATABASE_URL`, `JWT_SECRET`, ...)
//!
//! فایل `.env` قبل از این مرحله توسط `dotenvy` در `main.rs` لود میشه.

use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// secret پیش‌فرض؛ در production باید عوض بشه
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use link_shortener::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.slug_length, 6);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس پایه برای لینک‌های کوتاه
    pub base_url: String,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// کلید مخفی JWT
    pub jwt_secret: String,

    /// مدت اعتبار توکن سشن (ساعت)
    pub jwt_expiration_hours: u64,

    /// طول slug تصادفی
    pub slug_length: usize,

    /// حداکثر تلاش برای پیدا کردن slug آزاد
    pub slug_max_attempts: u32,

    /// محیط اجرا (development, testing, production)
    pub environment: Environment,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    /// محیط توسعه - لاگ pretty
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید - لاگ JSON
    Production,
}

impl Environment {
    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_url: "sqlite://data/app.db?mode=rwc".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            // 30 روز
            jwt_expiration_hours: 24 * 30,
            slug_length: crate::utils::DEFAULT_SLUG_LENGTH,
            slug_max_attempts: 10,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از متغیرهای محیطی
    ///
    /// مقادیر پیش‌فرض اول ست میشن و بعد `config::Environment` روشون
    /// نوشته میشه؛ مثلا `PORT=8080` کلید `port` رو override میکنه.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه مقداری قابل تبدیل به نوع فیلد نباشه
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("base_url", defaults.base_url)?
            .set_default("database_url", defaults.database_url)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_hours", defaults.jwt_expiration_hours as i64)?
            .set_default("slug_length", defaults.slug_length as i64)?
            .set_default("slug_max_attempts", i64::from(defaults.slug_max_attempts))?
            .set_default("environment", "development")?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// اعتبارسنجی تنظیمات
    pub fn validate(&self) -> Result<()> {
        if self.environment.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::Config(
                "JWT_SECRET must be changed in production".to_string()
            ));
        }

        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.slug_length == 0 {
            return Err(AppError::Config("SLUG_LENGTH must be positive".to_string()));
        }

        if self.slug_max_attempts == 0 {
            return Err(AppError::Config(
                "SLUG_MAX_ATTEMPTS must be positive".to_string()
            ));
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use link_shortener::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .host("0.0.0.0")
///     .build();
/// assert_eq!(config.server_addr(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    #[must_use]
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    /// تنظیم طول slug تصادفی
    #[must_use]
    pub fn slug_length(mut self, length: usize) -> Self {
        self.config.slug_length = length;
        self
    }

    /// تنظیم سقف تلاش برای slug آزاد
    #[must_use]
    pub fn slug_max_attempts(mut self, attempts: u32) -> Self {
        self.config.slug_max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اعتبارسنجی fail بشه
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.jwt_expiration_hours, 720);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .port(8080)
            .host("0.0.0.0")
            .slug_length(8)
            .build();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.slug_length, 8);
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from("production".to_string()), Environment::Production);
        assert_eq!(Environment::from("PROD".to_string()), Environment::Production);
        assert_eq!(Environment::from("test".to_string()), Environment::Testing);
        assert_eq!(Environment::from("unknown".to_string()), Environment::Development);
    }

    #[test]
    fn test_validation_fails_in_production_with_default_secret() {
        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .build();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_slug_settings() {
        assert!(ConfigBuilder::new().slug_length(0).build_validated().is_err());
        assert!(ConfigBuilder::new().slug_max_attempts(0).build_validated().is_err());
    }
}
