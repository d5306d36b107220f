//! Gallery endpoints under `/api/paintings`.

use crate::{
    errors::AppError,
    extract::{AppJson, AppQuery},
    middleware::AdminClaims,
    models::{
        artwork::{ArtworkFilter, ArtworkInput, ArtworkPatch},
        pagination::PageRequest,
    },
    services::artwork_service::DEFAULT_PAGE_SIZE,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Query params accepted by the gallery list.
#[derive(Debug, Deserialize)]
pub struct ListPaintingsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub featured: Option<bool>,
}

pub async fn list_paintings(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<ListPaintingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ArtworkFilter {
        category: q.category,
        search: q.search,
        featured_only: q.featured.unwrap_or(false),
    };
    let page = state
        .artworks
        .list(&filter, PageRequest::new(q.page, q.limit, DEFAULT_PAGE_SIZE))
        .await?;

    Ok(Json(json!({
        "paintings": page.items,
        "pagination": page.pagination,
    })))
}

/// `GET /api/paintings/categories`: category cards for the landing page.
pub async fn category_showcase(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.artworks.category_showcase().await?))
}

/// `GET /api/paintings/{id}`: accepts an id or a slug and counts the view.
pub async fn get_painting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let artwork = state.artworks.get_one(&key).await?;
    Ok(Json(artwork))
}

pub async fn create_painting(
    _admin: AdminClaims,
    State(state): State<AppState>,
    AppJson(input): AppJson<ArtworkInput>,
) -> Result<impl IntoResponse, AppError> {
    let artwork = state.artworks.create(input).await?;
    Ok((StatusCode::CREATED, Json(artwork)))
}

pub async fn update_painting(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ArtworkPatch>,
) -> Result<impl IntoResponse, AppError> {
    let artwork = state.artworks.update(painting_id(&id)?, patch).await?;
    Ok(Json(artwork))
}

pub async fn delete_painting(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.artworks.delete(painting_id(&id)?).await?;
    Ok(Json(json!({ "success": true })))
}

fn painting_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Painting not found"))
}
