//! Represents a catalogued artwork with its SEO sub-document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A single artwork in the gallery.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: Uuid,

    /// URL-friendly alias, derived from the title on create.
    pub slug: String,

    pub title: String,
    pub description: String,

    /// Free-form category label (e.g. "tanjore-paintings").
    pub category: String,

    pub medium: Option<String>,
    pub size: Option<String>,
    pub image_url: String,

    #[sqlx(json)]
    pub tags: Vec<String>,

    #[sqlx(flatten)]
    pub seo: Seo,

    /// Marks the artwork for promotional placement.
    pub featured: bool,

    /// Incremented on every detail fetch.
    pub views: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SEO metadata embedded in every artwork.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, Default, PartialEq, Eq, Validate)]
pub struct Seo {
    #[sqlx(rename = "seo_title")]
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 60,
        message = "SEO title is required and cannot be more than 60 characters"
    ))]
    pub title: String,

    #[sqlx(rename = "seo_description")]
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 160,
        message = "SEO description is required and cannot be more than 160 characters"
    ))]
    pub description: String,

    #[sqlx(rename = "seo_alt")]
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 125,
        message = "Alt text is required and cannot be more than 125 characters"
    ))]
    pub alt: String,

    #[sqlx(rename = "seo_keywords", json)]
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Full artwork payload used for create, and as the merge target for updates.
/// Missing fields deserialize to empty values so validation can report them
/// together.
#[derive(Deserialize, Clone, Debug, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtworkInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title is required and cannot be more than 100 characters"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "Description is required and cannot be more than 1000 characters"
    ))]
    pub description: String,

    #[validate(length(min = 1, message = "Please provide a category"))]
    pub category: String,

    pub medium: Option<String>,
    pub size: Option<String>,

    #[validate(length(min = 1, message = "Please provide an image URL"))]
    pub image_url: String,

    pub tags: Vec<String>,

    #[validate(nested)]
    pub seo: Seo,

    pub featured: bool,
}

impl ArtworkInput {
    /// Trim text fields and drop blank tags/keywords.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.category = self.category.trim().to_string();
        self.medium = trim_optional(self.medium);
        self.size = trim_optional(self.size);
        self.tags = clean_list(self.tags);
        self.seo.keywords = clean_list(self.seo.keywords);
        self
    }

    /// Apply a partial update on top of this payload.
    pub fn apply(mut self, patch: ArtworkPatch) -> Self {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(medium) = patch.medium {
            self.medium = Some(medium);
        }
        if let Some(size) = patch.size {
            self.size = Some(size);
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(seo) = patch.seo {
            if let Some(title) = seo.title {
                self.seo.title = title;
            }
            if let Some(description) = seo.description {
                self.seo.description = description;
            }
            if let Some(alt) = seo.alt {
                self.seo.alt = alt;
            }
            if let Some(keywords) = seo.keywords {
                self.seo.keywords = keywords;
            }
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
        self
    }
}

impl From<Artwork> for ArtworkInput {
    fn from(artwork: Artwork) -> Self {
        Self {
            title: artwork.title,
            description: artwork.description,
            category: artwork.category,
            medium: artwork.medium,
            size: artwork.size,
            image_url: artwork.image_url,
            tags: artwork.tags,
            seo: artwork.seo,
            featured: artwork.featured,
        }
    }
}

/// Partial update for an artwork; absent fields are left untouched.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub medium: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub seo: Option<SeoPatch>,
    pub featured: Option<bool>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SeoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub alt: Option<String>,
    pub keywords: Option<Vec<String>>,
}

/// Gallery list filters.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    /// Equality filter; `None` or `"all"` disables it.
    pub category: Option<String>,
    /// Free-text query over title, description, tags and SEO keywords.
    pub search: Option<String>,
    pub featured_only: bool,
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// A gallery category card: its artwork count and a cover image.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    pub key: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub href: String,
    pub count: i64,
    /// "1 piece", "3 pieces"
    pub count_label: String,
}

/// Outcome of the legacy category migration.
#[derive(Serialize, Debug, Clone)]
pub struct MigrationReport {
    /// Rows whose category was rewritten by this run.
    pub updated: u64,
    pub categories: Vec<CategoryCount>,
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
