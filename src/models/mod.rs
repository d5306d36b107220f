//! Core data models for the gallery back-end.
//!
//! Rows map to SQLite tables via `sqlx::FromRow` and serialize as camelCase
//! JSON via `serde`. Request payloads carry `validator` rules so that every
//! violated constraint is reported at once.

pub mod admin;
pub mod artwork;
pub mod inquiry;
pub mod pagination;
pub mod site_setting;
pub mod visit_log;
