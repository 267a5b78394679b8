//! The persisted article record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::prompts::Season;
use crate::quality::QualityVerdict;

/// A generated article as stored on disk and consumed by the site renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub product: String,
    pub product_name: String,
    pub product_link: String,
    pub product_image: String,
    pub language: String,
    pub language_name: String,
    pub angle: String,
    pub slug: String,
    pub generated_at: NaiveDateTime,
    pub season: Season,
    #[serde(default)]
    pub variation_seed: String,
    #[serde(default)]
    pub useless_detail: String,
    #[serde(default)]
    pub random_tangent: String,
    /// Gate verdict, present when the article went through the quality gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityVerdict>,
}

impl Article {
    /// Calendar date the article was generated on.
    pub fn generated_on(&self) -> NaiveDate {
        self.generated_at.date()
    }
}

/// Builds `{lang}-{product}-{angle}-{YYYYMMDD}-{n}`, lowercased, with every
/// character outside `[a-z0-9-]` replaced by `-`.
pub fn make_slug(
    language: &str,
    product: &str,
    angle: &str,
    date: NaiveDate,
    disambiguator: u16,
) -> String {
    let raw = format!(
        "{}-{}-{}-{}-{}",
        language,
        product,
        angle,
        date.format("%Y%m%d"),
        disambiguator
    );
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Whether `slug` is non-empty and only uses `[a-z0-9-]`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
