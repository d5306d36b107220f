//! InquiryService: contact-form submissions and their admin lifecycle.
//!
//! A submission is persisted first; the chat notification runs on a detached
//! task afterwards and its failure never reaches the caller.

use crate::{
    errors::{ServiceError, ServiceResult},
    models::{
        inquiry::{Inquiry, InquiryCounts, InquiryInput, InquiryPatch, InquiryStatus},
        pagination::{Page, PageRequest, Pagination},
    },
    services::{
        calendar::{Periods, local_midnight_utc},
        notifier::{Notifier, inquiry_message},
    },
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

const INQUIRY_COLUMNS: &str =
    "id, name, mobile, message, artwork_id, artwork_title, status, created_at, updated_at";

#[derive(Clone)]
pub struct InquiryService {
    pub db: Arc<SqlitePool>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl InquiryService {
    pub fn new(db: Arc<SqlitePool>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { db, notifier }
    }

    /// Validate and store a new inquiry with status `new`, then relay it.
    pub async fn submit(&self, input: InquiryInput) -> ServiceResult<Inquiry> {
        let mut input = input.normalized();
        input.validate()?;

        if let (Some(artwork_id), None) = (input.artwork_id, &input.artwork_title) {
            input.artwork_title = sqlx::query_scalar("SELECT title FROM artworks WHERE id = ?")
                .bind(artwork_id)
                .fetch_optional(&*self.db)
                .await?;
        }

        let now = Utc::now();
        let inquiry = sqlx::query_as::<_, Inquiry>(&format!(
            "INSERT INTO inquiries (id, name, mobile, message, artwork_id, artwork_title, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            INQUIRY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.mobile)
        .bind(&input.message)
        .bind(input.artwork_id)
        .bind(&input.artwork_title)
        .bind(InquiryStatus::New)
        .bind(now)
        .bind(now)
        .fetch_one(&*self.db)
        .await?;

        info!(id = %inquiry.id, "stored new inquiry");
        self.notify_detached(&inquiry);
        Ok(inquiry)
    }

    fn notify_detached(&self, inquiry: &Inquiry) {
        let Some(notifier) = self.notifier.clone() else {
            debug!("inquiry notifications disabled");
            return;
        };
        let text = inquiry_message(inquiry);
        let id = inquiry.id;
        tokio::spawn(async move {
            match notifier.send(&text).await {
                Ok(()) => debug!(%id, "inquiry notification sent"),
                Err(err) => warn!(%id, error = %err, "inquiry notification failed"),
            }
        });
    }

    /// Newest-first page of inquiries, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<InquiryStatus>,
        page: PageRequest,
    ) -> ServiceResult<Page<Inquiry>> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM inquiries");
        let mut select =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM inquiries", INQUIRY_COLUMNS));
        if let Some(status) = status {
            count.push(" WHERE status = ").push_bind(status);
            select.push(" WHERE status = ").push_bind(status);
        }
        select
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let total: i64 = count.build_query_scalar().fetch_one(&*self.db).await?;
        let items: Vec<Inquiry> = select.build_query_as().fetch_all(&*self.db).await?;

        Ok(Page {
            items,
            pagination: Pagination::new(page, total.max(0) as u64),
        })
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Inquiry> {
        sqlx::query_as::<_, Inquiry>(&format!(
            "SELECT {} FROM inquiries WHERE id = ?",
            INQUIRY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Inquiry".into()))
    }

    /// Merge `patch` onto the stored inquiry and re-validate before saving.
    pub async fn update(&self, id: Uuid, patch: InquiryPatch) -> ServiceResult<Inquiry> {
        let current = self.get(id).await?;
        let (input, status) = current.merged(patch);
        let input = input.normalized();
        input.validate()?;

        sqlx::query_as::<_, Inquiry>(&format!(
            "UPDATE inquiries SET name = ?, mobile = ?, message = ?, status = ?, updated_at = ?
             WHERE id = ?
             RETURNING {}",
            INQUIRY_COLUMNS
        ))
        .bind(&input.name)
        .bind(&input.mobile)
        .bind(&input.message)
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&*self.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Inquiry".into()))
    }

    pub async fn delete(&self, id: Uuid) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Inquiry".into()));
        }
        Ok(())
    }

    pub async fn counts(&self) -> ServiceResult<InquiryCounts> {
        self.counts_at(Local::now()).await
    }

    /// Inquiries created since local midnight, the 1st of the month and January 1st.
    pub async fn counts_at(&self, now: DateTime<Local>) -> ServiceResult<InquiryCounts> {
        let periods = Periods::containing(now);
        let since = |day: NaiveDate| async move {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inquiries WHERE created_at >= ?")
                .bind(local_midnight_utc(day))
                .fetch_one(&*self.db)
                .await
        };
        let (today, month, year) = futures::try_join!(
            since(periods.today),
            since(periods.month_start),
            since(periods.year_start)
        )?;
        Ok(InquiryCounts { today, month, year })
    }
}
