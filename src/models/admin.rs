//! Administrator accounts and the identity carried by the auth cookie.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum AdminRole {
    #[default]
    Admin,
    SuperAdmin,
}

/// Stored administrator row. Holds the password hash, so it is never
/// serialized; use [`AdminProfile`] for responses.
#[derive(Clone, FromRow, Debug)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: AdminRole,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of an administrator.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: AdminRole,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
            role: admin.role,
            last_login: admin.last_login,
        }
    }
}

/// Signed token payload: the identity plus issue/expiry timestamps.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    pub id: Uuid,
    pub username: String,
    pub role: AdminRole,
    pub iat: i64,
    pub exp: i64,
}

/// Payload for creating an administrator.
#[derive(Deserialize, Clone, Debug, Validate)]
pub struct NewAdmin {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    pub username: String,

    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: AdminRole,
}
