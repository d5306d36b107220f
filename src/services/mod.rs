//! Domain services. Each owns a handle to the shared SQLite pool and returns
//! `ServiceError`; the HTTP layer maps those onto status codes.

pub mod artwork_service;
pub mod auth_service;
pub mod calendar;
pub mod inquiry_service;
pub mod notifier;
pub mod rate_limiter;
pub mod settings_service;
pub mod stats_service;
pub mod upload_service;
pub mod visit_service;
