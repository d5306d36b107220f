use crate::{
    errors::AppError,
    middleware::{AdminClaims, ClientIp},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};

/// `POST /api/visits`: record the caller's visit for today.
pub async fn record_visit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let summary = state.visits.record(&ip, user_agent).await?;
    Ok(Json(summary))
}

/// `GET /api/admin/visits`
pub async fn visit_stats(
    _admin: AdminClaims,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.visits.stats().await?))
}
