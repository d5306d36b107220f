//! Dashboard totals across the catalogue and the inquiry inbox.

use crate::errors::ServiceResult;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_paintings: i64,
    pub total_inquiries: i64,
    pub total_views: i64,
    pub featured_paintings: i64,
}

#[derive(Clone)]
pub struct StatsService {
    pub db: Arc<SqlitePool>,
}

impl StatsService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub async fn totals(&self) -> ServiceResult<AdminStats> {
        Ok(sqlx::query_as::<_, AdminStats>(
            "SELECT
                 (SELECT COUNT(*) FROM artworks) AS total_paintings,
                 (SELECT COUNT(*) FROM inquiries) AS total_inquiries,
                 (SELECT COALESCE(SUM(views), 0) FROM artworks) AS total_views,
                 (SELECT COUNT(*) FROM artworks WHERE featured = 1) AS featured_paintings",
        )
        .fetch_one(&*self.db)
        .await?)
    }
}
