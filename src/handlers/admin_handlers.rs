//! Dashboard counters and the one-off category migration.

use crate::{errors::AppError, extract::AppJson, middleware::AdminClaims, state::AppState};
use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// `GET /api/admin/inquiries`
pub async fn inquiry_counts(
    _admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.inquiries.counts().await?))
}

/// `GET /api/admin/stats`
pub async fn dashboard_stats(
    _admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.stats.totals().await?))
}

#[derive(Debug, Deserialize)]
pub struct MigrateRequest {
    #[serde(default)]
    pub secret: String,
}

/// `POST /api/migrate`: authorized by the shared migration secret, not a session.
pub async fn migrate_categories(
    State(state): State<AppState>,
    AppJson(req): AppJson<MigrateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.secret.is_empty() || req.secret != state.migration_secret {
        warn!("category migration attempted with a wrong secret");
        return Err(AppError::unauthorized("Invalid migration secret"));
    }

    let report = state.artworks.migrate_categories().await?;
    Ok(Json(json!({
        "success": true,
        "updated": report.updated,
        "categories": report.categories,
    })))
}
