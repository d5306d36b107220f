//! ArtworkService: the public gallery catalogue and its admin CRUD.
//!
//! Free-text search runs against the `artworks_fts` FTS5 index, which the
//! schema triggers keep in step with the `artworks` table.

use crate::{
    errors::{ServiceError, ServiceResult},
    models::{
        artwork::{
            Artwork, ArtworkFilter, ArtworkInput, ArtworkPatch, CategoryCard, CategoryCount,
            MigrationReport,
        },
        pagination::{Page, PageRequest, Pagination},
    },
};
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite, types::Json};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 12;

const ARTWORK_COLUMNS: &str = "id, slug, title, description, category, medium, size, image_url, \
     tags, seo_title, seo_description, seo_alt, seo_keywords, featured, views, created_at, updated_at";

/// Legacy category labels and the taxonomy entry each one maps to.
pub const CATEGORY_MIGRATIONS: [(&str, &str); 5] = [
    ("landscape", "tanjore-paintings"),
    ("portrait", "portraits"),
    ("abstract", "oil-paintings"),
    ("still-life", "sketch-painting"),
    ("other", "oil-paintings"),
];

/// Canonical categories as `(key, display name, description)`, in display order.
pub const CATEGORIES: [(&str, &str, &str); 4] = [
    (
        "tanjore-paintings",
        "Tanjore Paintings",
        "Gold leaf and gemstone work in the Thanjavur tradition",
    ),
    ("portraits", "Portraits", "Capturing human emotion"),
    ("oil-paintings", "Oil Paintings", "Rich colour and texture on canvas"),
    ("sketch-painting", "Sketches", "Line and shade in pencil and charcoal"),
];

#[derive(Clone)]
pub struct ArtworkService {
    pub db: Arc<SqlitePool>,
}

impl ArtworkService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Newest-first page of artworks matching `filter`.
    pub async fn list(
        &self,
        filter: &ArtworkFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Artwork>> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM artworks");
        push_filters(&mut count, filter);

        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM artworks", ARTWORK_COLUMNS));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, seq DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let total: i64 = count.build_query_scalar().fetch_one(&*self.db).await?;
        let items: Vec<Artwork> = select.build_query_as().fetch_all(&*self.db).await?;
        debug!(total, returned = items.len(), "listed artworks");

        Ok(Page {
            items,
            pagination: Pagination::new(page, total.max(0) as u64),
        })
    }

    /// Fetch an artwork by id or slug, counting the view. The returned row
    /// already carries the incremented counter.
    pub async fn get_one(&self, key: &str) -> ServiceResult<Artwork> {
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(artwork) = self.bump_views("id", id).await? {
                return Ok(artwork);
            }
        }
        self.bump_views("slug", key.to_string())
            .await?
            .ok_or_else(|| ServiceError::NotFound("Painting".into()))
    }

    async fn bump_views<T>(&self, column: &str, key: T) -> ServiceResult<Option<Artwork>>
    where
        T: for<'q> sqlx::Encode<'q, Sqlite> + sqlx::Type<Sqlite> + Send + 'static,
    {
        Ok(sqlx::query_as::<_, Artwork>(&format!(
            "UPDATE artworks SET views = views + 1 WHERE {} = ? RETURNING {}",
            column, ARTWORK_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&*self.db)
        .await?)
    }

    /// Plain lookup without touching the view counter.
    pub async fn find(&self, id: Uuid) -> ServiceResult<Artwork> {
        sqlx::query_as::<_, Artwork>(&format!(
            "SELECT {} FROM artworks WHERE id = ?",
            ARTWORK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Painting".into()))
    }

    pub async fn create(&self, input: ArtworkInput) -> ServiceResult<Artwork> {
        let input = input.normalized();
        input.validate()?;

        let id = Uuid::new_v4();
        let slug = slug_for(&input.title, id);
        let now = Utc::now();

        let artwork = sqlx::query_as::<_, Artwork>(&format!(
            "INSERT INTO artworks (id, slug, title, description, category, medium, size, image_url,
                 tags, seo_title, seo_description, seo_alt, seo_keywords, featured, views, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
             RETURNING {}",
            ARTWORK_COLUMNS
        ))
        .bind(id)
        .bind(&slug)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.medium)
        .bind(&input.size)
        .bind(&input.image_url)
        .bind(Json(&input.tags))
        .bind(&input.seo.title)
        .bind(&input.seo.description)
        .bind(&input.seo.alt)
        .bind(Json(&input.seo.keywords))
        .bind(input.featured)
        .bind(now)
        .bind(now)
        .fetch_one(&*self.db)
        .await?;

        info!(id = %artwork.id, slug = %artwork.slug, "created artwork");
        Ok(artwork)
    }

    /// Merge `patch` onto the stored artwork, re-validate and save. The slug
    /// is kept so published links stay valid.
    pub async fn update(&self, id: Uuid, patch: ArtworkPatch) -> ServiceResult<Artwork> {
        let current = self.find(id).await?;
        let input = ArtworkInput::from(current).apply(patch).normalized();
        input.validate()?;

        sqlx::query_as::<_, Artwork>(&format!(
            "UPDATE artworks SET title = ?, description = ?, category = ?, medium = ?, size = ?,
                 image_url = ?, tags = ?, seo_title = ?, seo_description = ?, seo_alt = ?,
                 seo_keywords = ?, featured = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            ARTWORK_COLUMNS
        ))
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.medium)
        .bind(&input.size)
        .bind(&input.image_url)
        .bind(Json(&input.tags))
        .bind(&input.seo.title)
        .bind(&input.seo.description)
        .bind(&input.seo.alt)
        .bind(Json(&input.seo.keywords))
        .bind(input.featured)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Painting".into()))
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Painting".into()));
        }
        info!(%id, "deleted artwork");
        Ok(())
    }

    /// Rewrite legacy category labels in a single statement. Running it
    /// again finds nothing to change.
    pub async fn migrate_categories(&self) -> ServiceResult<MigrationReport> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE artworks SET category = CASE category");
        for (from, to) in CATEGORY_MIGRATIONS {
            builder
                .push(" WHEN ")
                .push_bind(from)
                .push(" THEN ")
                .push_bind(to);
        }
        builder
            .push(" ELSE category END, updated_at = ")
            .push_bind(Utc::now())
            .push(" WHERE category IN (");
        let mut legacy = builder.separated(", ");
        for (from, _) in CATEGORY_MIGRATIONS {
            legacy.push_bind(from);
        }
        builder.push(")");

        let updated = builder.build().execute(&*self.db).await?.rows_affected();
        let categories = self.category_counts().await?;
        info!(updated, "migrated artwork categories");
        Ok(MigrationReport {
            updated,
            categories,
        })
    }

    pub async fn category_counts(&self) -> ServiceResult<Vec<CategoryCount>> {
        Ok(sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM artworks
             GROUP BY category
             ORDER BY count DESC, category ASC",
        )
        .fetch_all(&*self.db)
        .await?)
    }

    /// One card per canonical category. The cover is the newest featured
    /// artwork, else the newest artwork, else a per-category placeholder.
    pub async fn category_showcase(&self) -> ServiceResult<Vec<CategoryCard>> {
        let counts = self.category_counts().await?;
        let mut cards = Vec::with_capacity(CATEGORIES.len());
        for (key, name, description) in CATEGORIES {
            let count = counts
                .iter()
                .find(|c| c.category == key)
                .map_or(0, |c| c.count);
            let cover: Option<String> = sqlx::query_scalar(
                "SELECT image_url FROM artworks WHERE category = ?
                 ORDER BY featured DESC, created_at DESC, seq DESC
                 LIMIT 1",
            )
            .bind(key)
            .fetch_optional(&*self.db)
            .await?;

            cards.push(CategoryCard {
                key: key.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                image: cover.unwrap_or_else(|| format!("/uploads/default-{}.jpg", key)),
                href: format!("/gallery?category={}", key),
                count,
                count_label: format!("{} piece{}", count, if count == 1 { "" } else { "s" }),
            });
        }
        Ok(cards)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ArtworkFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(category) = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != "all")
    {
        builder.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(query) = filter.search.as_deref().and_then(fts_query) {
        builder
            .push(" AND seq IN (SELECT rowid FROM artworks_fts WHERE artworks_fts MATCH ")
            .push_bind(query)
            .push(")");
    }
    if filter.featured_only {
        builder.push(" AND featured = 1");
    }
}

/// Turn free text into an FTS5 query matching any of its words. Each word is
/// quoted so operators and punctuation in user input are taken literally.
pub fn fts_query(search: &str) -> Option<String> {
    let terms: Vec<String> = search
        .split_whitespace()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

/// Lowercase ASCII alphanumerics joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "artwork".to_string()
    } else {
        slug.to_string()
    }
}

fn slug_for(title: &str, id: Uuid) -> String {
    let simple = id.simple().to_string();
    format!("{}-{}", slugify(title), &simple[..8])
}
