use crate::{
    errors::ServiceResult,
    models::site_setting::{SettingsPatch, SiteSettingRow, SiteSettings},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct SettingsService {
    pub db: Arc<SqlitePool>,
}

impl SettingsService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Current settings; defaults fill whatever has never been set.
    pub async fn get(&self) -> ServiceResult<SiteSettings> {
        let row = sqlx::query_as::<_, SiteSettingRow>(
            "SELECT hero_image_url, artist_image_url, about_text, artist_name,
                    artist_experience, favicon_url
             FROM site_settings WHERE id = 1",
        )
        .fetch_optional(&*self.db)
        .await?;
        Ok(row.unwrap_or_default().into())
    }

    /// Create the singleton row or overwrite only the provided fields.
    pub async fn update(&self, patch: SettingsPatch) -> ServiceResult<SiteSettings> {
        sqlx::query(
            "INSERT INTO site_settings
                 (id, hero_image_url, artist_image_url, about_text, artist_name, artist_experience, favicon_url)
             VALUES (1, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 hero_image_url    = COALESCE(excluded.hero_image_url, site_settings.hero_image_url),
                 artist_image_url  = COALESCE(excluded.artist_image_url, site_settings.artist_image_url),
                 about_text        = COALESCE(excluded.about_text, site_settings.about_text),
                 artist_name       = COALESCE(excluded.artist_name, site_settings.artist_name),
                 artist_experience = COALESCE(excluded.artist_experience, site_settings.artist_experience),
                 favicon_url       = COALESCE(excluded.favicon_url, site_settings.favicon_url)",
        )
        .bind(&patch.hero_image_url)
        .bind(&patch.artist_image_url)
        .bind(&patch.about_text)
        .bind(&patch.artist_name)
        .bind(&patch.artist_experience)
        .bind(&patch.favicon_url)
        .execute(&*self.db)
        .await?;

        info!("site settings updated");
        self.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::site_setting::DEFAULT_ARTIST_NAME, test_support::memory_pool};

    #[tokio::test]
    async fn defaults_apply_before_first_update() {
        let svc = SettingsService::new(memory_pool().await);
        let settings = svc.get().await.unwrap();
        assert_eq!(settings, SiteSettings::default());
        assert_eq!(settings.hero_image_url, "/uploads/default-hero.jpg");
        assert_eq!(settings.favicon_url, "");
    }

    #[tokio::test]
    async fn updates_touch_only_provided_fields() {
        let svc = SettingsService::new(memory_pool().await);
        svc.update(SettingsPatch {
            hero_image_url: Some("/uploads/1-hero.jpg".into()),
            ..Default::default()
        })
        .await
        .unwrap();

        let settings = svc
            .update(SettingsPatch {
                favicon_url: Some("/uploads/2-icon.png".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(settings.hero_image_url, "/uploads/1-hero.jpg");
        assert_eq!(settings.favicon_url, "/uploads/2-icon.png");
        assert_eq!(settings.artist_name, DEFAULT_ARTIST_NAME);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&*svc.db)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
