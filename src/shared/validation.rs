use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Regex for validating slug fields
    /// Must be lowercase alphanumeric with single hyphens between words
    /// - Valid: "biet-thu-hien-dai", "van-phong", "2024"
    /// - Invalid: "-nha-pho", "nha-pho-", "nha--pho", "Nha-Pho", "nha_pho"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    static ref SLUG_DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive a URL slug from a display name.
///
/// Lower-cases, strips combining diacritics after NFD decomposition, drops
/// anything outside `[a-z0-9\s-]`, trims and joins words with single hyphens.
/// Letters without a decomposition (e.g. `đ`) are dropped, not transliterated.
pub fn slugify(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();

    let cleaned = SLUG_DISALLOWED.replace_all(&folded, "");
    WHITESPACE_RUN
        .replace_all(cleaned.trim(), "-")
        .into_owned()
}
