//! HTTP handlers. They parse requests, delegate to the services and shape
//! JSON responses.

pub mod admin_handlers;
pub mod artwork_handlers;
pub mod auth_handlers;
pub mod health_handlers;
pub mod inquiry_handlers;
pub mod settings_handlers;
pub mod upload_handlers;
pub mod visit_handlers;
