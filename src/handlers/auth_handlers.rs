//! Login, logout and session check for the admin area.

use crate::{
    errors::AppError,
    extract::AppJson,
    middleware::{AdminClaims, clear_cookie, session_cookie},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/login`: sets the `auth-token` cookie on success.
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("Username and password are required"));
    }

    let outcome = state.auth.login(&req.username, &req.password).await?;
    Ok((
        [(
            header::SET_COOKIE,
            session_cookie(&outcome.token, state.secure_cookies),
        )],
        Json(json!({ "success": true, "user": outcome.admin })),
    ))
}

/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie(state.secure_cookies))],
        Json(json!({ "success": true })),
    )
}

/// `GET /api/auth/check`
pub async fn check(AdminClaims(claims): AdminClaims) -> impl IntoResponse {
    Json(json!({
        "authenticated": true,
        "user": {
            "id": claims.id,
            "username": claims.username,
            "role": claims.role,
        }
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

/// `PUT /api/auth/password`: replace the signed-in admin's password.
/// Existing tokens stay valid until they expire.
pub async fn change_password(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.set_password(claims.id, &req.new_password).await?;
    Ok(Json(json!({ "success": true })))
}
