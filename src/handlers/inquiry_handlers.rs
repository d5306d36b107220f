use crate::{
    errors::AppError,
    extract::{AppJson, AppQuery},
    middleware::AdminClaims,
    models::{
        inquiry::{InquiryInput, InquiryPatch, InquiryStatus},
        pagination::PageRequest,
    },
    services::inquiry_service::DEFAULT_PAGE_SIZE,
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

#[derive(Debug, Deserialize)]
pub struct ListInquiriesQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// `POST /api/inquiries`: public contact form.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    AppJson(input): AppJson<InquiryInput>,
) -> Result<impl IntoResponse, AppError> {
    let inquiry = state.inquiries.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "inquiry": inquiry })),
    ))
}

pub async fn list_inquiries(
    _admin: AdminClaims,
    State(state): State<AppState>,
    AppQuery(q): AppQuery<ListInquiriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = match q.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<InquiryStatus>().map_err(AppError::bad_request)?),
    };
    let page = state
        .inquiries
        .list(status, PageRequest::new(q.page, q.limit, DEFAULT_PAGE_SIZE))
        .await?;

    Ok(Json(json!({
        "inquiries": page.items,
        "pagination": page.pagination,
    })))
}

pub async fn update_inquiry(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<InquiryPatch>,
) -> Result<impl IntoResponse, AppError> {
    let inquiry = state.inquiries.update(inquiry_id(&id)?, patch).await?;
    Ok(Json(inquiry))
}

pub async fn delete_inquiry(
    _admin: AdminClaims,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.inquiries.delete(inquiry_id(&id)?).await?;
    Ok(Json(json!({ "success": true })))
}

fn inquiry_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Inquiry not found"))
}
