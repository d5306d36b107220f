use crate::{errors::AppError, middleware::AdminClaims, state::AppState};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// `POST /api/upload`: multipart form with a single `file` field.
pub async fn upload_file(
    AdminClaims(admin): AdminClaims,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid multipart body: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::bad_request("No file uploaded"));
        }

        let url = state
            .uploader
            .upload(bytes, &filename, content_type.as_deref())
            .await?;
        info!(username = %admin.username, %url, "file uploaded");
        return Ok(Json(json!({ "success": true, "url": url })));
    }

    Err(AppError::bad_request("No file uploaded"))
}
