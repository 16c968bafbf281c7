use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use validator::{ValidateUrl, ValidationError};

lazy_static! {
    /// Regex for URL-safe slugs
    /// Must be lowercase alphanumeric with single hyphens between segments
    /// - Valid: "industrial", "floor-scales", "class-3"
    /// - Invalid: "-scales", "scales-", "floor--scales", "Scales", "floor_scales"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Slug format check. Blank input passes so the required-field rule can
/// report it instead.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || SLUG_REGEX.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("slug").with_message(Cow::Borrowed(
        "slug must be lowercase alphanumeric segments separated by single hyphens (e.g., 'floor-scales')",
    )))
}

/// URL check for image fields. Blank input passes; it clears the image.
pub fn validate_image_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_url() {
        return Ok(());
    }
    Err(ValidationError::new("url").with_message(Cow::Borrowed("image must be a valid URL")))
}

/// Deserialize a present field (even `null`) as `Some`, so that a missing
/// field and an explicit `null` can be told apart with `Option<Option<T>>`.
///
/// Use together with `#[serde(default)]`.
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Trim a text value, mapping blank input to `None`
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Normalize a slug: surrounding whitespace removed, lowercased
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}
