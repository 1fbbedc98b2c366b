//! Field normalization: slugs, dialable phone numbers and rating captions.

use std::sync::LazyLock;

use regex::Regex;

use crate::records::Record;

pub const MAX_SLUG_CHARS: usize = 80;
pub const FALLBACK_SLUG: &str = "demo";
pub const DEFAULT_MAPS_URL: &str = "https://www.google.com/maps";
pub const EMPTY_DISPLAY: &str = "—";

// `\w` and `\s` are Unicode-aware in the regex crate.
static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_-]+").unwrap());
static NON_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

/// Lowercase, hyphen-separated identifier safe for use as a directory name.
/// Never empty: falls back to `"demo"`.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let cleaned = NON_SLUG_RE.replace_all(&lower, "");
    let hyphenated = SEPARATOR_RE.replace_all(&cleaned, "-");
    let slug: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Output directory name for a business: `slugify("<name>-<city>")`.
pub fn slug_for(business_name: &str, city: &str) -> String {
    slugify(&format!("{}-{}", business_name, city))
}

/// Digits only, keeping a leading `+` for international numbers.
pub fn phone_raw(phone: &str) -> String {
    let phone = phone.trim();
    let (prefix, rest) = match phone.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", phone),
    };
    format!("{}{}", prefix, NON_DIGIT_RE.replace_all(rest, ""))
}

pub fn rating_text(rating: &str) -> String {
    let r = rating.trim();
    if r.is_empty() {
        "Google rating".to_string()
    } else {
        format!("{} på Google", r)
    }
}

fn or_display_fallback(value: &str) -> String {
    if value.is_empty() {
        EMPTY_DISPLAY.to_string()
    } else {
        value.to_string()
    }
}

/// Placeholder values for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub slug: String,
    pub business_name: String,
    pub city: String,
    pub phone: String,
    pub phone_raw: String,
    pub address: String,
    pub rating_text: String,
    pub maps_url: String,
    pub year: String,
}

impl PageFields {
    /// Returns `None` when the record lacks a business name or city.
    pub fn from_record(record: &Record, year: i32) -> Option<Self> {
        if !record.is_valid() {
            return None;
        }

        let maps_url = if record.maps_url.is_empty() {
            DEFAULT_MAPS_URL.to_string()
        } else {
            record.maps_url.clone()
        };

        Some(PageFields {
            slug: slug_for(&record.business_name, &record.city),
            business_name: record.business_name.clone(),
            city: record.city.clone(),
            phone: or_display_fallback(&record.phone),
            phone_raw: phone_raw(&record.phone),
            address: or_display_fallback(&record.address),
            rating_text: rating_text(&record.rating),
            maps_url,
            year: year.to_string(),
        })
    }

    /// (placeholder name, value) pairs in template order.
    pub fn placeholders(&self) -> [(&'static str, &str); 8] {
        [
            ("business_name", self.business_name.as_str()),
            ("city", self.city.as_str()),
            ("phone", self.phone.as_str()),
            ("phone_raw", self.phone_raw.as_str()),
            ("address", self.address.as_str()),
            ("rating_text", self.rating_text.as_str()),
            ("maps_url", self.maps_url.as_str()),
            ("year", self.year.as_str()),
        ]
    }
}
