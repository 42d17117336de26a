//! # مدل کاربر (User Model)
//!
//! Entity و DTO‌های مربوط به کاربر

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::ResultExt;

// =====================================
// User Entity
// =====================================
/// Entity کاربر
///
/// `is_admin` فقط برای اولین کاربر ثبت‌نام شده true هست و بعدا
/// دوباره محاسبه نمیشه.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,

    /// هش رمز عبور - هیچوقت به کلاینت ارسال نمیشه
    pub password_hash: String,

    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// بررسی رمز عبور
    ///
    /// # Errors
    /// اگه هش ذخیره شده قابل parse نباشه خطا برمیگردونه
    pub fn verify_password(&self, password: &str) -> crate::error::Result<bool> {
        use argon2::{Argon2, PasswordHash, PasswordVerifier};

        let parsed_hash = PasswordHash::new(&self.password_hash).map_internal()?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// تبدیل User به UserResponse
///
/// این تضمین میکنه password_hash هیچوقت leak نشه
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

// =====================================
// New User (داخلی)
// =====================================
/// داده برای ساخت کاربر
///
/// `is_admin` اینجا نیست؛ موقع insert از روی تعداد کاربرها تعیین میشه.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    /// ساخت کاربر جدید با هش کردن رمز عبور (Argon2 با salt تصادفی)
    ///
    /// # Errors
    /// خطا برمیگردونه اگه hashing fail بشه
    pub fn new(username: impl Into<String>, password: &str) -> crate::error::Result<Self> {
        use argon2::{
            password_hash::{rand_core::OsRng, SaltString},
            Argon2, PasswordHasher,
        };

        let salt = SaltString::generate(&mut OsRng);

        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_internal()?
            .to_string();

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }
}

// =====================================
// Current User (هویت request)
// =====================================
/// هویت احراز شده که به هسته داده میشه
///
/// هسته هیچوقت توکن رو نمیبینه؛ فقط همین سه فیلد.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

// =====================================
// API Request DTOs
// =====================================
/// درخواست ثبت‌نام
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// درخواست ورود
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// =====================================
// API Response DTOs
// =====================================
/// پاسخ اطلاعات کاربر
///
/// توجه: password_hash اینجا نیست!
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// پاسخ ورود موفق
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =====================================
// JWT Claims
// =====================================
/// محتویات توکن سشن
///
/// - `sub`: شناسه کاربر (به صورت رشته)
/// - `exp`: زمان انقضا (Unix timestamp)
/// - `iat`: زمان صدور
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// ساخت claims جدید
    #[must_use]
    pub fn new(user_id: i64, username: &str, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    /// آیا توکن منقضی شده؟
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// شناسه عددی کاربر
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let new_user = NewUser::new("alice", "hunter2").unwrap();
        assert_ne!(new_user.password_hash, "hunter2");

        let user = User {
            id: 1,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_admin: true,
            created_at: Utc::now(),
        };

        assert!(user.verify_password("hunter2").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_claims() {
        let claims = Claims::new(42, "alice", 1);
        assert!(!claims.is_expired());
        assert_eq!(claims.user_id(), Some(42));

        let expired = Claims {
            exp: Utc::now().timestamp() - 3600,
            ..claims
        };
        assert!(expired.is_expired());
    }
}
