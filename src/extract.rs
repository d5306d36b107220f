//! Request extractors whose rejections use the JSON error envelope.

use crate::errors::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// `axum::Json` that answers malformed bodies with a 400 `AppError`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` with the same rejection handling.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
