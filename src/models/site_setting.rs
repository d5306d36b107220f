//! Singleton site settings with documented fallbacks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_HERO_IMAGE_URL: &str = "/uploads/default-hero.jpg";
pub const DEFAULT_ARTIST_IMAGE_URL: &str = "/uploads/default-artist.jpg";
pub const DEFAULT_ARTIST_NAME: &str = "Professional Artist";
pub const DEFAULT_ARTIST_EXPERIENCE: &str = "15+ Years Experience";
pub const DEFAULT_ABOUT_TEXT: &str = "With over 15 years of experience in paint sketch artistry, \
I've dedicated my life to capturing the world's beauty through color and texture. Each piece is \
created with passion and attention to detail, ensuring that every artwork tells a unique story.";

/// Raw singleton row; every column is optional.
#[derive(FromRow, Debug, Clone, Default)]
pub struct SiteSettingRow {
    pub hero_image_url: Option<String>,
    pub artist_image_url: Option<String>,
    pub about_text: Option<String>,
    pub artist_name: Option<String>,
    pub artist_experience: Option<String>,
    pub favicon_url: Option<String>,
}

/// Resolved settings, with defaults applied to absent or blank values.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub hero_image_url: String,
    pub artist_image_url: String,
    pub about_text: String,
    pub artist_name: String,
    pub artist_experience: String,
    /// Empty when no favicon has been uploaded.
    pub favicon_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettingRow::default().into()
    }
}

impl From<SiteSettingRow> for SiteSettings {
    fn from(row: SiteSettingRow) -> Self {
        fn or(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        Self {
            hero_image_url: or(row.hero_image_url, DEFAULT_HERO_IMAGE_URL),
            artist_image_url: or(row.artist_image_url, DEFAULT_ARTIST_IMAGE_URL),
            about_text: or(row.about_text, DEFAULT_ABOUT_TEXT),
            artist_name: or(row.artist_name, DEFAULT_ARTIST_NAME),
            artist_experience: or(row.artist_experience, DEFAULT_ARTIST_EXPERIENCE),
            favicon_url: row.favicon_url.unwrap_or_default(),
        }
    }
}

/// Partial settings update; only provided fields are written.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub hero_image_url: Option<String>,
    pub artist_image_url: Option<String>,
    pub about_text: Option<String>,
    pub artist_name: Option<String>,
    pub artist_experience: Option<String>,
    pub favicon_url: Option<String>,
}
