//! # سرویس احراز هویت (Authentication Service)
//!
//! ثبت‌نام، ورود و JWT. هسته لینک‌ها فقط `CurrentUser` رو از این سرویس میگیره.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    config::Config,
    database::{Repository, UserRepository},
    error::{AppError, Result},
    models::{Claims, CurrentUser, LoginRequest, LoginResponse, NewUser, RegisterRequest, User, UserResponse},
    utils,
};

use super::Service;

// =====================================
// Auth Service
// =====================================
/// سرویس احراز هویت
///
/// # مسئولیت‌ها:
/// - ثبت‌نام کاربر (اولین کاربر admin میشه)
/// - ورود و صدور توکن
/// - تبدیل توکن به `CurrentUser`
#[derive(Debug, Clone)]
pub struct AuthService {
    repo: UserRepository,
    config: Arc<Config>,
}

impl Service for AuthService {}

impl AuthService {
    #[must_use]
    pub fn new(repo: UserRepository, config: Arc<Config>) -> Self {
        Self { repo, config }
    }

    /// ثبت‌نام کاربر جدید
    ///
    /// # Errors
    /// - `Validation`: ورودی نامعتبر
    /// - `Conflict`: نام کاربری تکراری
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        request.validate()?;

        if self.repo.username_exists(&request.username).await? {
            return Err(AppError::Conflict("Username already registered".to_string()));
        }

        let new_user = NewUser::new(&request.username, &request.password)?;

        let user = match self.repo.create(&new_user).await {
            Err(AppError::UniqueViolation(_)) => {
                return Err(AppError::Conflict("Username already registered".to_string()))
            }
            other => other?,
        };

        info!(user_id = user.id, is_admin = user.is_admin, "New user registered");

        Ok(user.into())
    }

    /// ورود کاربر
    ///
    /// پیام خطا برای نام کاربری ناموجود و رمز اشتباه یکسانه.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        let user = self
            .repo
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !user.verify_password(&request.password)? {
            warn!(
                username = %utils::mask_string(&request.username, 2),
                "Failed login attempt"
            );
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = self.generate_token(&user)?;
        let expires_at =
            Utc::now() + chrono::Duration::hours(self.config.jwt_expiration_hours as i64);

        info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            user: user.into(),
            token,
            expires_at,
        })
    }

    /// اعتبارسنجی توکن JWT
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "Token verification failed");
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        if token_data.claims.is_expired() {
            return Err(AppError::Unauthorized("Token expired".to_string()));
        }

        Ok(token_data.claims)
    }

    /// تبدیل توکن به هویت کاربر
    ///
    /// کاربر از دیتابیس خونده میشه تا `is_admin` همیشه به‌روز باشه.
    pub async fn current_user(&self, token: &str) -> Result<CurrentUser> {
        let claims = self.verify_token(token)?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))?;

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(CurrentUser::from(&user))
    }

    fn generate_token(&self, user: &User) -> Result<String> {
        let claims = Claims::new(user.id, &user.username, self.config.jwt_expiration_hours);
        let encoding_key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)?)
    }
}

// =====================================
// Token Utilities
// =====================================
/// استخراج توکن از header Authorization
///
/// # Format
/// `Authorization: Bearer <token>`
#[must_use]
pub fn extract_token_from_header(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn service() -> AuthService {
        let db = Database::in_memory().await.unwrap();
        AuthService::new(UserRepository::new(db), Arc::new(Config::default()))
    }

    fn register(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "secret-pass".to_string(),
        }
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token_from_header("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_token_from_header("Basic abc123"), None);
        assert_eq!(extract_token_from_header("Bearer "), None);
        assert_eq!(extract_token_from_header("abc123"), None);
    }

    #[tokio::test]
    async fn test_register_login_and_identify() {
        let auth = service().await;

        let alice = auth.register(register("alice")).await.unwrap();
        assert!(alice.is_admin);

        let login = auth
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "secret-pass".to_string(),
            })
            .await
            .unwrap();

        let current = auth.current_user(&login.token).await.unwrap();
        assert_eq!(current.id, alice.id);
        assert_eq!(current.username, "alice");
        assert!(current.is_admin);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let auth = service().await;
        auth.register(register("alice")).await.unwrap();

        let err = auth.register(register("alice")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let auth = service().await;
        auth.register(register("alice")).await.unwrap();

        let err = auth
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let auth = service().await;
        assert!(matches!(
            auth.current_user("not-a-jwt").await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
