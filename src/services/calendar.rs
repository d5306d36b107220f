//! Calendar boundaries in the server's local timezone.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Start days of the current day, month and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periods {
    pub today: NaiveDate,
    pub month_start: NaiveDate,
    pub year_start: NaiveDate,
}

impl Periods {
    pub fn containing(now: DateTime<Local>) -> Self {
        let today = now.date_naive();
        Self {
            today,
            month_start: today.with_day(1).unwrap_or(today),
            year_start: today.with_ordinal(1).unwrap_or(today),
        }
    }
}

/// The UTC instant of local midnight at the start of `day`.
pub fn local_midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_align_to_calendar() {
        let now = Local.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).single().unwrap();
        let periods = Periods::containing(now);
        assert_eq!(periods.today, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(periods.month_start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(periods.year_start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn midnight_round_trips_to_local_date() {
        let day = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        let utc = local_midnight_utc(day);
        assert_eq!(utc.with_timezone(&Local).date_naive(), day);
    }
}
