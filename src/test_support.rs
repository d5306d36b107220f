//! Shared fixtures for unit and router tests.

use crate::{
    config::{AppConfig, NotifierConfig, SeedAdmin},
    models::artwork::{ArtworkInput, Seo},
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{path::Path, str::FromStr, sync::Arc};

/// A migrated in-memory database. A single long-lived connection keeps the
/// in-memory database alive and shared by every query in the test.
pub async fn memory_pool() -> Arc<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    crate::db::migrate(&pool).await.unwrap();
    Arc::new(pool)
}

pub fn artwork_input(title: &str, category: &str) -> ArtworkInput {
    ArtworkInput {
        title: title.into(),
        description: format!("{title} description"),
        category: category.into(),
        image_url: format!("/uploads/{}.jpg", title.to_lowercase().replace(' ', "-")),
        seo: Seo {
            title: title.into(),
            description: format!("{title} by the artist"),
            alt: format!("Image of {title}"),
            keywords: vec![],
        },
        ..Default::default()
    }
}

pub fn test_config(root: &Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: "sqlite::memory:".into(),
        upload_dir: root.join("uploads").to_string_lossy().into_owned(),
        admin_ui_dir: root.join("admin-ui").to_string_lossy().into_owned(),
        jwt_secret: "test-secret".into(),
        secure_cookies: false,
        migration_secret: "let-me-migrate".into(),
        seed_admin: SeedAdmin {
            username: "admin".into(),
            email: "admin@admin.com".into(),
            password: "Admin@123".into(),
        },
        notifier: NotifierConfig::default(),
    }
}
