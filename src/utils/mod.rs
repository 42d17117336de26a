//! # ماژول توابع کمکی (Utilities)
//!
//! تولید slug، نرمالایز کردن URL مقصد و parse فیلتر تاریخ.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::{rngs::OsRng, Rng};

// =====================================
// Constants
// =====================================
/// الفبای slug تصادفی: حروف کوچک و بزرگ و اعداد (62 کاراکتر، case-sensitive)
pub const SLUG_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// طول پیش‌فرض slug تصادفی
pub const DEFAULT_SLUG_LENGTH: usize = 6;

/// slug‌هایی که مسیرهای ثابت Router اون‌ها رو می‌پوشونن و هیچوقت به `/:slug` نمیرسن
pub const RESERVED_SLUGS: &[&str] = &["api", "health"];

/// فرمت فیلتر تاریخ داشبورد
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

// =====================================
// Slug Generation
// =====================================
/// تولیدکننده slug تصادفی
///
/// الفبا و طول قابل تنظیمه تا تست‌ها بتونن با فضای کوچیک
/// (مثلا الفبای `"ab"` و طول 1) برخورد رو قطعی ایجاد کنن.
/// منبع تصادف `OsRng` هست (CSPRNG سیستم‌عامل).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl SlugGenerator {
    /// ساخت generator با الفبا و طول دلخواه
    ///
    /// الفبا بر اساس `char` نگه داشته میشه، پس نماد چندبایتی هم یک نماد حساب میشه.
    /// الفبای خالی یا طول صفر معنی نداره؛ در این حالت به پیش‌فرض برمیگرده.
    #[must_use]
    pub fn new(alphabet: &str, length: usize) -> Self {
        let alphabet = if alphabet.is_empty() {
            SLUG_ALPHABET
        } else {
            alphabet
        };

        Self {
            alphabet: alphabet.chars().collect(),
            length: if length == 0 { DEFAULT_SLUG_LENGTH } else { length },
        }
    }

    /// generator با الفبای 62 کاراکتری
    #[must_use]
    pub fn alphanumeric(length: usize) -> Self {
        Self::new(SLUG_ALPHABET, length)
    }

    /// طول slug‌های تولیدی
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// تولید یک slug کاندید
    ///
    /// # مثال
    /// ```rust
    /// use link_shortener::utils::SlugGenerator;
    ///
    /// let slug = SlugGenerator::default().generate();
    /// assert_eq!(slug.len(), 6);
    /// assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    /// ```
    #[must_use]
    pub fn generate(&self) -> String {
        let mut rng = OsRng;

        (0..self.length)
            .map(|_| {
                let idx = rng.gen_range(0..self.alphabet.len());
                self.alphabet[idx]
            })
            .collect()
    }
}

impl Default for SlugGenerator {
    fn default() -> Self {
        Self::alphanumeric(DEFAULT_SLUG_LENGTH)
    }
}

// =====================================
// Input Normalization
// =====================================
/// نرمالایز کردن URL مقصد
///
/// فقط یه تبدیل رشته‌ایه، نه اعتبارسنجی: اگه با `http` شروع نشه
/// `https://` اولش اضافه میشه. URL خراب همون‌طور قبول میشه.
///
/// # مثال
/// ```rust
/// use link_shortener::utils::normalize_target_url;
///
/// assert_eq!(normalize_target_url("example.com"), "https://example.com");
/// assert_eq!(normalize_target_url("http://example.com"), "http://example.com");
/// ```
#[must_use]
pub fn normalize_target_url(target_url: &str) -> String {
    if target_url.starts_with("http") {
        target_url.to_string()
    } else {
        format!("https://{}", target_url)
    }
}

/// slug سفارشی بعد از trim؛ رشته خالی یعنی "slug نداریم"
#[must_use]
pub fn custom_slug(candidate: Option<&str>) -> Option<&str> {
    candidate.map(str::trim).filter(|s| !s.is_empty())
}

/// آیا این slug توسط یک مسیر ثابت پوشونده میشه؟ (case-sensitive مثل Router)
#[must_use]
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

// =====================================
// Date Filter
// =====================================
/// تبدیل `YYYY-MM-DD` به بازه `[شروع روز، شروع روز بعد)` در UTC
///
/// رشته خراب `None` برمیگردونه؛ فیلتر اعمال نمیشه و خطا هم نیست.
#[must_use]
pub fn parse_day_range(value: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let day = NaiveDate::parse_from_str(value.trim(), FILTER_DATE_FORMAT).ok()?;
    let start = day.and_hms_opt(0, 0, 0)?.and_utc();

    Some((start, start + Duration::days(1)))
}

// =====================================
// Security Utilities
// =====================================
/// Mask کردن بخشی از متن (برای لاگ‌ها)
///
/// # مثال
/// ```rust
/// use link_shortener::utils::mask_string;
///
/// assert_eq!(mask_string("secret123", 3), "sec***");
/// ```
#[must_use]
pub fn mask_string(text: &str, visible_chars: usize) -> String {
    if text.chars().count() <= visible_chars {
        return "*".repeat(text.chars().count());
    }

    let visible: String = text.chars().take(visible_chars).collect();
    format!("{}***", visible)
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_default_slug() {
        let slug = SlugGenerator::default().generate();
        assert_eq!(slug.len(), DEFAULT_SLUG_LENGTH);
        assert!(slug.chars().all(|c| SLUG_ALPHABET.contains(c)));
    }

    #[test]
    fn test_reduced_alphabet() {
        let generator = SlugGenerator::new("ab", 3);
        for _ in 0..50 {
            let slug = generator.generate();
            assert_eq!(slug.len(), 3);
            assert!(slug.chars().all(|c| c == 'a' || c == 'b'));
        }
    }

    #[test]
    fn test_multibyte_alphabet_yields_its_own_symbols() {
        let generator = SlugGenerator::new("éü", 4);
        for _ in 0..50 {
            let slug = generator.generate();
            assert_eq!(slug.chars().count(), 4);
            assert!(slug.chars().all(|c| c == 'é' || c == 'ü'));
        }
    }

    #[test]
    fn test_degenerate_generator_falls_back() {
        assert_eq!(SlugGenerator::new("", 0), SlugGenerator::default());
    }

    #[test]
    fn test_alphabet_has_62_symbols() {
        let mut symbols: Vec<char> = SLUG_ALPHABET.chars().collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), 62);
    }

    #[test]
    fn test_normalize_target_url() {
        assert_eq!(normalize_target_url("example.com"), "https://example.com");
        assert_eq!(normalize_target_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_target_url("http://example.com"), "http://example.com");
        // تبدیل رشته‌ای محض، نه اعتبارسنجی
        assert_eq!(normalize_target_url("not a url"), "https://not a url");
        assert_eq!(normalize_target_url("httpbin.org"), "httpbin.org");
    }

    #[test]
    fn test_custom_slug_trimming() {
        assert_eq!(custom_slug(None), None);
        assert_eq!(custom_slug(Some("")), None);
        assert_eq!(custom_slug(Some("   ")), None);
        assert_eq!(custom_slug(Some("  MySlug ")), Some("MySlug"));
    }

    #[test]
    fn test_reserved_slugs() {
        assert!(is_reserved_slug("health"));
        assert!(is_reserved_slug("api"));
        assert!(!is_reserved_slug("Health"));
        assert!(!is_reserved_slug("apis"));
    }

    #[test]
    fn test_parse_day_range() {
        let (start, end) = parse_day_range("2024-01-01").expect("valid date");
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        assert!(parse_day_range("2024-13-01").is_none());
        assert!(parse_day_range("01/02/2024").is_none());
        assert!(parse_day_range("").is_none());
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("secret123", 3), "sec***");
        assert_eq!(mask_string("ab", 5), "**");
    }
}
