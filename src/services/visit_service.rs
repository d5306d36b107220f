//! VisitService: one visit row per client IP per local calendar day.

use crate::{
    errors::{ServiceError, ServiceResult},
    models::visit_log::{IpVisitStat, VisitStats, VisitSummary},
    services::{calendar::Periods, rate_limiter::SlidingWindowLimiter},
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const LEADERBOARD_LIMIT: i64 = 1000;

#[derive(Clone)]
pub struct VisitService {
    pub db: Arc<SqlitePool>,
    limiter: Arc<SlidingWindowLimiter>,
}

impl VisitService {
    pub fn new(db: Arc<SqlitePool>, limiter: Arc<SlidingWindowLimiter>) -> Self {
        Self { db, limiter }
    }

    pub async fn record(&self, ip: &str, user_agent: Option<&str>) -> ServiceResult<VisitSummary> {
        self.record_at(ip, user_agent, Local::now()).await
    }

    /// Rate-limit, then insert the `(ip, day)` row unless it already exists.
    /// Repeat visits on the same day leave the table unchanged.
    pub async fn record_at(
        &self,
        ip: &str,
        user_agent: Option<&str>,
        now: DateTime<Local>,
    ) -> ServiceResult<VisitSummary> {
        if !self.limiter.check(ip) {
            warn!(%ip, "visit rate limit exceeded");
            return Err(ServiceError::RateLimited);
        }

        let periods = Periods::containing(now);
        let stamp = now.with_timezone(&Utc);
        let inserted = sqlx::query(
            "INSERT INTO visit_logs (id, ip, user_agent, date, visited_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (ip, date) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(ip)
        .bind(user_agent)
        .bind(periods.today)
        .bind(stamp)
        .bind(stamp)
        .execute(&*self.db)
        .await;

        match inserted {
            Ok(result) => debug!(%ip, new = result.rows_affected() == 1, "recorded visit"),
            Err(err) if crate::db::is_unique_violation(&err) => {
                debug!(%ip, "visit already recorded today")
            }
            Err(err) => return Err(err.into()),
        }

        let (today, month, year) = futures::try_join!(
            self.rows_since(periods.today),
            self.rows_since(periods.month_start),
            self.rows_since(periods.year_start)
        )?;
        Ok(VisitSummary {
            success: true,
            ip: ip.to_string(),
            today,
            month,
            year,
        })
    }

    async fn rows_since(&self, day: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM visit_logs WHERE date >= ?")
            .bind(day)
            .fetch_one(&*self.db)
            .await
    }

    async fn distinct_ips_since(&self, day: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(DISTINCT ip) FROM visit_logs WHERE date >= ?")
            .bind(day)
            .fetch_one(&*self.db)
            .await
    }

    pub async fn stats(&self) -> ServiceResult<VisitStats> {
        self.stats_at(Local::now()).await
    }

    /// Distinct visitors per period plus the all-time per-IP leaderboard,
    /// busiest first and most recent first among ties.
    pub async fn stats_at(&self, now: DateTime<Local>) -> ServiceResult<VisitStats> {
        let periods = Periods::containing(now);
        let leaderboard = async {
            sqlx::query_as::<_, IpVisitStat>(
                "SELECT ip, COUNT(*) AS count, MAX(visited_at) AS last_visit
                 FROM visit_logs
                 GROUP BY ip
                 ORDER BY count DESC, last_visit DESC
                 LIMIT ?",
            )
            .bind(LEADERBOARD_LIMIT)
            .fetch_all(&*self.db)
            .await
        };

        let (today, month, year, ip_stats) = futures::try_join!(
            self.distinct_ips_since(periods.today),
            self.distinct_ips_since(periods.month_start),
            self.distinct_ips_since(periods.year_start),
            leaderboard
        )?;
        Ok(VisitStats {
            today,
            month,
            year,
            ip_stats,
        })
    }
}
