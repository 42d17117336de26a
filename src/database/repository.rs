//! # Repository Pattern
//!
//! لایه انتزاعی بین منطق برنامه و دیتابیس.
//! - سرویس‌ها نمیدونن داده کجا ذخیره میشه
//! - همه SQL‌ها اینجا جمع شدن
//!
//! ## قواعد مهم
//! - نقض UNIQUE روی `links.slug` یا `users.username` به
//!   `AppError::UniqueViolation` تبدیل میشه تا لایه بالا تصمیم بگیره.
//! - افزایش کلیک یک دستور SQL اتمیه؛ هیچوقت read-modify-write نیست.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use super::Database;
use crate::error::{AppError, Result};
use crate::models::{Link, LinkFilter, NewLink, NewUser, Resolution, User};

const LINK_COLUMNS: &str = "id, slug, target_url, owner_id, click_count, created_at";
const USER_COLUMNS: &str = "id, username, password_hash, is_admin, created_at";

// =====================================
// Base Repository Trait
// =====================================
/// Trait پایه برای Repository‌ها
///
/// # مفاهیم:
/// - `#[async_trait]`: macro برای async در traits
/// - Associated Types: `type Entity` و `type Id`
#[async_trait]
pub trait Repository: Send + Sync {
    /// نوع Entity که این repository باهاش کار میکنه
    type Entity: Send + Sync;

    /// نوع شناسه (ID)
    type Id: Send + Sync;

    /// پیدا کردن با ID
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;

    /// شمارش کل
    async fn count(&self) -> Result<i64>;
}

/// تبدیل خطای UNIQUE دیتابیس به `UniqueViolation`
fn map_unique_violation(err: sqlx::Error, what: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::UniqueViolation(what.to_string())
        }
        other => AppError::Database(other),
    }
}

// =====================================
// Link Repository
// =====================================
/// Repository لینک‌ها (Link Store)
#[derive(Debug, Clone)]
pub struct LinkRepository {
    db: Database,
}

impl LinkRepository {
    /// ساخت repository جدید
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// درج لینک جدید
    ///
    /// # Errors
    /// `UniqueViolation` اگه slug قبلا ثبت شده باشه
    pub async fn create(&self, new_link: &NewLink) -> Result<Link> {
        let sql = format!(
            "INSERT INTO links (slug, target_url, owner_id, click_count, created_at) \
             VALUES (?, ?, ?, 0, ?) RETURNING {LINK_COLUMNS}"
        );

        sqlx::query_as::<_, Link>(&sql)
            .bind(&new_link.slug)
            .bind(&new_link.target_url)
            .bind(new_link.owner_id)
            .bind(new_link.created_at)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique_violation(e, &format!("links.slug = {}", new_link.slug)))
    }

    /// پیدا کردن با slug (تطابق دقیق و case-sensitive)
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE slug = ?");

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(link)
    }

    /// چک کردن وجود slug
    pub async fn exists(&self, slug: &str) -> Result<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM links WHERE slug = ?)")
            .bind(slug)
            .fetch_one(self.db.pool())
            .await?;

        Ok(found != 0)
    }

    /// لینک‌های یک کاربر، جدیدترین اول
    pub async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Link>> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE owner_id = ? \
             ORDER BY created_at DESC, id DESC"
        );

        let links = sqlx::query_as::<_, Link>(&sql)
            .bind(owner_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(links)
    }

    /// همه لینک‌ها با فیلتر اختیاری، جدیدترین اول
    ///
    /// # مفاهیم:
    /// - `QueryBuilder`: ساخت query پویا با bind امن
    pub async fn find_all(&self, filter: &LinkFilter) -> Result<Vec<Link>> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT l.id, l.slug, l.target_url, l.owner_id, l.click_count, l.created_at \
             FROM links l JOIN users u ON u.id = l.owner_id WHERE 1 = 1",
        );

        if let Some(username) = &filter.username {
            query.push(" AND u.username = ").push_bind(username.clone());
        }

        if let Some((from, until)) = filter.created_between {
            query
                .push(" AND l.created_at >= ")
                .push_bind(from)
                .push(" AND l.created_at < ")
                .push_bind(until);
        }

        query.push(" ORDER BY l.created_at DESC, l.id DESC");

        let links = query
            .build_query_as::<Link>()
            .fetch_all(self.db.pool())
            .await?;

        Ok(links)
    }

    /// حذف لینک فقط اگه متعلق به `owner_id` باشه
    ///
    /// تعداد ردیف‌های حذف شده رو برمیگردونه (0 یا 1).
    pub async fn delete_owned(&self, id: i64, owner_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM links WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// پیدا کردن slug و افزایش اتمی شمارنده کلیک در یک دستور
    ///
    /// مقصد و مقدار جدید شمارنده رو برمیگردونه؛ `None` یعنی slug وجود نداره.
    pub async fn increment_clicks(&self, slug: &str) -> Result<Option<Resolution>> {
        let resolution = sqlx::query_as::<_, Resolution>(
            r#"
            UPDATE links SET click_count = click_count + 1
            WHERE slug = ?
            RETURNING target_url, click_count
            "#,
        )
        .bind(slug)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(resolution)
    }
}

#[async_trait]
impl Repository for LinkRepository {
    type Entity = Link;
    type Id = i64;

    async fn find_by_id(&self, id: &i64) -> Result<Option<Link>> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = ?");

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(*id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(link)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

// =====================================
// User Repository
// =====================================
/// Repository کاربران
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// پیدا کردن با نام کاربری
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(user)
    }

    /// بررسی وجود نام کاربری
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let found =
            sqlx::query_scalar::<_, i64>("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.db.pool())
                .await?;

        Ok(found != 0)
    }

    /// ایجاد کاربر جدید
    ///
    /// `is_admin` داخل همون INSERT محاسبه میشه: فقط وقتی جدول خالیه true میشه.
    ///
    /// # Errors
    /// `UniqueViolation` اگه نام کاربری تکراری باشه
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, is_admin, created_at) \
             VALUES (?, ?, (SELECT COUNT(*) = 0 FROM users), ?) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(chrono::Utc::now())
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| map_unique_violation(e, &format!("users.username = {}", new_user.username)))
    }

    /// همه کاربران به ترتیب نام (برای فیلتر داشبورد ادمین)
    pub async fn find_all(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username ASC");

        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(self.db.pool())
            .await?;

        Ok(users)
    }
}

#[async_trait]
impl Repository for UserRepository {
    type Entity = User;
    type Id = i64;

    async fn find_by_id(&self, id: &i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(*id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(user)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkBuilder;

    async fn setup() -> (LinkRepository, UserRepository) {
        let db = Database::in_memory().await.unwrap();
        (LinkRepository::new(db.clone()), UserRepository::new(db))
    }

    async fn user(users: &UserRepository, name: &str) -> User {
        users
            .create(&NewUser {
                username: name.to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_user_is_admin() {
        let (_, users) = setup().await;

        assert!(user(&users, "alice").await.is_admin);
        assert!(!user(&users, "bob").await.is_admin);
        assert_eq!(users.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let (_, users) = setup().await;
        user(&users, "alice").await;

        let err = users
            .create(&NewUser {
                username: "alice".to_string(),
                password_hash: "y".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (links, users) = setup().await;
        let owner = user(&users, "alice").await;

        let new_link = LinkBuilder::new("example.com", owner.id).slug("abc123").build().unwrap();
        let link = links.create(&new_link).await.unwrap();

        assert_eq!(link.click_count, 0);
        assert!(links.exists("abc123").await.unwrap());
        assert!(!links.exists("ABC123").await.unwrap());
        assert_eq!(links.find_by_slug("abc123").await.unwrap(), Some(link.clone()));
        assert_eq!(links.find_by_id(&link.id).await.unwrap(), Some(link));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_unique_violation() {
        let (links, users) = setup().await;
        let owner = user(&users, "alice").await;

        let new_link = LinkBuilder::new("example.com", owner.id).slug("abc123").build().unwrap();
        links.create(&new_link).await.unwrap();

        let err = links.create(&new_link).await.unwrap_err();
        assert!(matches!(err, AppError::UniqueViolation(_)));
        assert_eq!(links.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_increment_and_delete_owned() {
        let (links, users) = setup().await;
        let alice = user(&users, "alice").await;
        let bob = user(&users, "bob").await;

        let link = links
            .create(&LinkBuilder::new("example.com", alice.id).slug("abc").build().unwrap())
            .await
            .unwrap();

        let first = links.increment_clicks("abc").await.unwrap().unwrap();
        assert_eq!(first.target_url, "https://example.com");
        assert_eq!(first.click_count, 1);
        assert_eq!(links.increment_clicks("abc").await.unwrap().unwrap().click_count, 2);
        assert_eq!(links.increment_clicks("ABC").await.unwrap(), None);

        assert_eq!(links.delete_owned(link.id, bob.id).await.unwrap(), 0);
        assert_eq!(links.delete_owned(link.id, alice.id).await.unwrap(), 1);
        assert_eq!(links.increment_clicks("abc").await.unwrap(), None);
    }
}
