//! Represents a contact-form inquiry, optionally tied to an artwork.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Read,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::Read => "read",
            InquiryStatus::Responded => "responded",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(InquiryStatus::New),
            "read" => Ok(InquiryStatus::Read),
            "responded" => Ok(InquiryStatus::Responded),
            "closed" => Ok(InquiryStatus::Closed),
            other => Err(format!("unknown inquiry status `{}`", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub mobile: String,
    pub message: String,

    /// Artwork the visitor asked about, with its title at submission time.
    pub artwork_id: Option<Uuid>,
    pub artwork_title: Option<String>,

    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact-form payload. Missing fields deserialize as empty so that all
/// violations are reported together.
#[derive(Deserialize, Clone, Debug, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InquiryInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name is required and cannot be more than 100 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 20,
        message = "Mobile number is required and cannot be more than 20 characters"
    ))]
    pub mobile: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Message is required and cannot be more than 2000 characters"
    ))]
    pub message: String,

    pub artwork_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Artwork title cannot be more than 100 characters"))]
    pub artwork_title: Option<String>,
}

impl InquiryInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.mobile = self.mobile.trim().to_string();
        self.artwork_title = self
            .artwork_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }
}

/// Admin-side partial update. Absent fields are left untouched.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub message: Option<String>,
    pub status: Option<InquiryStatus>,
}

impl Inquiry {
    /// Merge a patch, returning the validatable payload and resulting status.
    pub fn merged(&self, patch: InquiryPatch) -> (InquiryInput, InquiryStatus) {
        let input = InquiryInput {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            mobile: patch.mobile.unwrap_or_else(|| self.mobile.clone()),
            message: patch.message.unwrap_or_else(|| self.message.clone()),
            artwork_id: self.artwork_id,
            artwork_title: self.artwork_title.clone(),
        };
        (input, patch.status.unwrap_or(self.status))
    }
}

/// Inquiries created since local midnight / the 1st of the month / January 1st.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InquiryCounts {
    pub today: i64,
    pub month: i64,
    pub year: i64,
}
