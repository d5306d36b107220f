//! Aggregates built from the per-IP daily `visit_logs` rows.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Result of recording a visit: row counts for the current periods.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VisitSummary {
    pub success: bool,
    pub ip: String,
    pub today: i64,
    pub month: i64,
    pub year: i64,
}

/// Distinct-IP counters plus the per-IP leaderboard.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VisitStats {
    pub today: i64,
    pub month: i64,
    pub year: i64,
    pub ip_stats: Vec<IpVisitStat>,
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpVisitStat {
    pub ip: String,
    pub count: i64,
    pub last_visit: Option<DateTime<Utc>>,
}
