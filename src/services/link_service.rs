//! # سرویس لینک
//!
//! منطق اصلی برنامه: تخصیص slug، resolve کردن و افزایش کلیک،
//! و محدود کردن دسترسی بر اساس مالکیت.
//!
//! ## قواعد:
//! - slug تصادفی: تولید، probe با `exists` و در صورت برخورد تولید دوباره.
//!   تعداد تلاش‌ها سقف داره (`slug_max_attempts`).
//! - slug سفارشی: بعد از trim همون‌طور استفاده میشه؛ تکراری بودن `SlugConflict` میده.
//! - slug‌های رزرو شده (`api`، `health`) مثل slug گرفته شده رفتار میکنن.
//! - فاصله بین `exists` و `INSERT` با UNIQUE constraint پوشش داده میشه.
//! - resolve کردن = شمردن: کلیک قبل از برگردوندن redirect commit میشه.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::{
    config::Config,
    database::{LinkRepository, UserRepository},
    error::{AppError, Result},
    models::{
        CreateLinkRequest, CurrentUser, DashboardQuery, DashboardResponse, Link, LinkBuilder,
        LinkFilter, LinkResponse, Resolution, UserResponse,
    },
    utils::{self, SlugGenerator},
};

use super::Service;

// =====================================
// Link Service
// =====================================
/// سرویس مدیریت لینک‌ها
///
/// # مسئولیت‌ها:
/// - ساخت لینک کوتاه (Slug Allocator)
/// - Redirect و افزایش شمارنده (Redirect Resolver)
/// - لیست و حذف بر اساس مالکیت
#[derive(Debug, Clone)]
pub struct LinkService {
    links: LinkRepository,
    users: UserRepository,
    generator: SlugGenerator,
    config: Arc<Config>,
}

impl Service for LinkService {}

impl LinkService {
    /// ساخت سرویس جدید با generator پیش‌فرض (الفبای 62 کاراکتری)
    #[must_use]
    pub fn new(links: LinkRepository, users: UserRepository, config: Arc<Config>) -> Self {
        Self {
            links,
            users,
            generator: SlugGenerator::alphanumeric(config.slug_length),
            config,
        }
    }

    /// جایگزین کردن generator (مثلا الفبای کوچیک در تست‌ها)
    #[must_use]
    pub fn with_generator(mut self, generator: SlugGenerator) -> Self {
        self.generator = generator;
        self
    }

    // ---------------------------------------------
    // Slug Allocator
    // ---------------------------------------------

    /// ساخت لینک کوتاه جدید
    ///
    /// # Errors
    /// - `Validation`: `target_url` خالیه
    /// - `SlugConflict`: slug سفارشی قبلا گرفته شده یا رزرو شده
    /// - `Internal`: بعد از `slug_max_attempts` تلاش slug آزاد پیدا نشد
    #[instrument(skip(self, owner, request), fields(username = %owner.username))]
    pub async fn create_link(
        &self,
        owner: &CurrentUser,
        request: CreateLinkRequest,
    ) -> Result<LinkResponse> {
        request.validate()?;

        let link = match utils::custom_slug(request.slug.as_deref()) {
            Some(slug) => self.insert_custom(owner, slug, &request.target_url).await?,
            None => self.insert_random(owner, &request.target_url).await?,
        };

        info!(slug = %link.slug, link_id = link.id, "Created new short link");

        Ok(LinkResponse::from_link(&link, &self.config.base_url))
    }

    /// درج با slug سفارشی
    async fn insert_custom(&self, owner: &CurrentUser, slug: &str, target_url: &str) -> Result<Link> {
        if utils::is_reserved_slug(slug) || self.links.exists(slug).await? {
            debug!(slug = %slug, "Custom slug already taken");
            return Err(AppError::slug_conflict(slug, target_url));
        }

        let new_link = LinkBuilder::new(target_url, owner.id).slug(slug).build()?;

        match self.links.create(&new_link).await {
            // یکی دیگه بین probe و insert همین slug رو گرفت
            Err(AppError::UniqueViolation(_)) => Err(AppError::slug_conflict(slug, target_url)),
            other => other,
        }
    }

    /// درج با slug تصادفی
    async fn insert_random(&self, owner: &CurrentUser, target_url: &str) -> Result<Link> {
        let max_attempts = self.config.slug_max_attempts;

        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate();

            if utils::is_reserved_slug(&candidate) || self.links.exists(&candidate).await? {
                debug!(slug = %candidate, attempt, "Generated slug collided");
                continue;
            }

            let new_link = LinkBuilder::new(target_url, owner.id)
                .slug(candidate)
                .build()?;

            match self.links.create(&new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::UniqueViolation(_)) => {
                    debug!(slug = %new_link.slug, attempt, "Generated slug lost insert race");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = max_attempts,
            slug_length = self.generator.length(),
            "Could not allocate a free slug"
        );

        Err(AppError::Internal(
            "Failed to generate unique slug".to_string(),
        ))
    }

    // ---------------------------------------------
    // Redirect Resolver
    // ---------------------------------------------

    /// پیدا کردن مقصد slug و شمردن کلیک
    ///
    /// lookup و افزایش یک دستور SQL هستن، پس لینکی که همزمان حذف بشه
    /// یا شمرده میشه یا `LinkNotFound` میده.
    ///
    /// # Errors
    /// `LinkNotFound` اگه slug وجود نداشته باشه
    #[instrument(skip(self))]
    pub async fn resolve(&self, slug: &str) -> Result<Resolution> {
        let resolution = self
            .links
            .increment_clicks(slug)
            .await?
            .ok_or_else(|| AppError::LinkNotFound(slug.to_string()))?;

        debug!(slug = %slug, click_count = resolution.click_count, "Resolved short link");

        Ok(resolution)
    }

    // ---------------------------------------------
    // Ownership / Query
    // ---------------------------------------------

    /// لینک‌های قابل مشاهده برای caller، جدیدترین اول
    ///
    /// کاربر عادی فقط لینک‌های خودش رو میبینه و فیلترها نادیده گرفته میشن.
    pub async fn list_links(&self, caller: &CurrentUser, filter: &LinkFilter) -> Result<Vec<Link>> {
        if caller.is_admin {
            self.links.find_all(filter).await
        } else {
            self.links.find_by_owner(caller.id).await
        }
    }

    /// حذف لینک (فقط مالک، حتی برای ادمین)
    ///
    /// لینک ناموجود یا متعلق به دیگری بی‌صدا نادیده گرفته میشه.
    /// تعداد ردیف‌های حذف شده برمیگرده.
    #[instrument(skip(self, caller), fields(username = %caller.username))]
    pub async fn delete_link(&self, caller: &CurrentUser, link_id: i64) -> Result<u64> {
        let deleted = self.links.delete_owned(link_id, caller.id).await?;

        if deleted > 0 {
            info!(link_id, "Deleted link");
        } else {
            debug!(link_id, "Delete matched no owned link");
        }

        Ok(deleted)
    }

    /// داده داشبورد: لینک‌ها، فیلترها و (برای ادمین) لیست کاربرها
    pub async fn dashboard(
        &self,
        caller: &CurrentUser,
        query: DashboardQuery,
    ) -> Result<DashboardResponse> {
        let (filter, all_users) = if caller.is_admin {
            let filter = LinkFilter::from_query(
                query.filter_user.as_deref(),
                query.filter_date.as_deref(),
            );
            let users: Vec<UserResponse> = self
                .users
                .find_all()
                .await?
                .into_iter()
                .map(UserResponse::from)
                .collect();
            (filter, users)
        } else {
            (LinkFilter::default(), Vec::new())
        };

        let links: Vec<LinkResponse> = self
            .list_links(caller, &filter)
            .await?
            .iter()
            .map(|link| LinkResponse::from_link(link, &self.config.base_url))
            .collect();

        let echo = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| caller.is_admin && !v.is_empty())
        };

        Ok(DashboardResponse {
            user: caller.clone(),
            links,
            all_users,
            filter_user: echo(query.filter_user),
            filter_date: echo(query.filter_date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, Repository};
    use crate::models::NewUser;

    async fn setup() -> (LinkService, CurrentUser) {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.clone());
        let owner = users
            .create(&NewUser {
                username: "alice".to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap();

        let service = LinkService::new(
            LinkRepository::new(db),
            users,
            Arc::new(Config::default()),
        );

        (service, CurrentUser::from(&owner))
    }

    fn request(target_url: &str, slug: Option<&str>) -> CreateLinkRequest {
        CreateLinkRequest {
            target_url: target_url.to_string(),
            slug: slug.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn test_random_slug_shape() {
        let (service, owner) = setup().await;

        let link = service.create_link(&owner, request("example.com", None)).await.unwrap();

        assert_eq!(link.slug.len(), 6);
        assert!(link.slug.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.short_url, format!("http://localhost:3000/{}", link.slug));
    }

    #[tokio::test]
    async fn test_blank_custom_slug_falls_back_to_random() {
        let (service, owner) = setup().await;

        let link = service.create_link(&owner, request("example.com", Some("   "))).await.unwrap();
        assert_eq!(link.slug.len(), 6);
    }

    #[tokio::test]
    async fn test_custom_slug_is_trimmed_and_kept_verbatim() {
        let (service, owner) = setup().await;

        let link = service
            .create_link(&owner, request("example.com", Some("  My-Slug!  ")))
            .await
            .unwrap();
        assert_eq!(link.slug, "My-Slug!");
    }

    #[tokio::test]
    async fn test_empty_target_is_rejected() {
        let (service, owner) = setup().await;

        let err = service.create_link(&owner, request("", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_conflict_carries_raw_target() {
        let (service, owner) = setup().await;
        service.create_link(&owner, request("example.com", Some("abc123"))).await.unwrap();

        let err = service
            .create_link(&owner, request("other.org", Some("abc123")))
            .await
            .unwrap_err();

        match err {
            AppError::SlugConflict { slug, target_url } => {
                assert_eq!(slug, "abc123");
                assert_eq!(target_url, "other.org");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reserved_custom_slug_conflicts() {
        let (service, owner) = setup().await;

        for slug in ["health", "api"] {
            let err = service
                .create_link(&owner, request("example.com", Some(slug)))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::SlugConflict { slug: ref s, .. } if s == slug));
        }

        let link = service
            .create_link(&owner, request("example.com", Some("Health")))
            .await
            .unwrap();
        assert_eq!(link.slug, "Health");
    }

    #[tokio::test]
    async fn test_resolve_counts_clicks() {
        let (service, owner) = setup().await;
        service.create_link(&owner, request("example.com", Some("abc123"))).await.unwrap();

        let first = service.resolve("abc123").await.unwrap();
        let second = service.resolve("abc123").await.unwrap();

        assert_eq!(first.target_url, "https://example.com");
        assert_eq!(first.click_count, 1);
        assert_eq!(second.click_count, 2);

        assert!(matches!(
            service.resolve("ABC123").await,
            Err(AppError::LinkNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let (service, owner) = setup().await;
        let link = service.create_link(&owner, request("example.com", None)).await.unwrap();

        let stranger = CurrentUser {
            id: owner.id + 100,
            username: "mallory".to_string(),
            is_admin: true,
        };

        assert_eq!(service.delete_link(&stranger, link.id).await.unwrap(), 0);
        assert_eq!(service.delete_link(&owner, link.id).await.unwrap(), 1);
        assert_eq!(service.delete_link(&owner, link.id).await.unwrap(), 0);
        assert_eq!(service.links.count().await.unwrap(), 0);
    }
}
