//! Site settings endpoints. Reads are public; writes need an admin session.

use crate::{
    errors::AppError, extract::AppJson, middleware::AdminClaims,
    models::site_setting::SettingsPatch, state::AppState,
};
use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroImageBody {
    pub hero_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistImageBody {
    pub artist_image_url: Option<String>,
    pub artist_name: Option<String>,
    pub artist_experience: Option<String>,
    pub about_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconBody {
    pub favicon_url: Option<String>,
}

pub async fn get_hero_image(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get().await?;
    Ok(Json(json!({ "heroImageUrl": settings.hero_image_url })))
}

pub async fn set_hero_image(
    _admin: AdminClaims,
    State(state): State<AppState>,
    AppJson(body): AppJson<HeroImageBody>,
) -> Result<impl IntoResponse, AppError> {
    let url = required(body.hero_image_url, "Hero image URL is required")?;
    let settings = state
        .settings
        .update(SettingsPatch {
            hero_image_url: Some(url),
            ..Default::default()
        })
        .await?;
    Ok(Json(json!({ "success": true, "heroImageUrl": settings.hero_image_url })))
}

pub async fn get_artist_image(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get().await?;
    Ok(Json(json!({
        "artistImageUrl": settings.artist_image_url,
        "artistName": settings.artist_name,
        "artistExperience": settings.artist_experience,
        "aboutText": settings.about_text,
    })))
}

/// Any subset of the artist fields may be sent; blank strings are ignored.
pub async fn set_artist_image(
    _admin: AdminClaims,
    State(state): State<AppState>,
    AppJson(body): AppJson<ArtistImageBody>,
) -> Result<impl IntoResponse, AppError> {
    let patch = SettingsPatch {
        artist_image_url: non_blank(body.artist_image_url),
        artist_name: non_blank(body.artist_name),
        artist_experience: non_blank(body.artist_experience),
        about_text: non_blank(body.about_text),
        ..Default::default()
    };
    if patch.artist_image_url.is_none()
        && patch.artist_name.is_none()
        && patch.artist_experience.is_none()
        && patch.about_text.is_none()
    {
        return Err(AppError::bad_request("No artist settings provided"));
    }

    let settings = state.settings.update(patch).await?;
    Ok(Json(json!({ "success": true, "settings": settings })))
}

pub async fn get_favicon(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get().await?;
    Ok(Json(json!({ "faviconUrl": settings.favicon_url })))
}

pub async fn set_favicon(
    _admin: AdminClaims,
    State(state): State<AppState>,
    AppJson(body): AppJson<FaviconBody>,
) -> Result<impl IntoResponse, AppError> {
    let url = required(body.favicon_url, "Favicon URL is required")?;
    let settings = state
        .settings
        .update(SettingsPatch {
            favicon_url: Some(url),
            ..Default::default()
        })
        .await?;
    Ok(Json(json!({ "success": true, "faviconUrl": settings.favicon_url })))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::bad_request(message))
}
