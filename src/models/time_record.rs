use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Lifecycle state derived from the record flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordState {
    Running,
    Paused,
    Stopped,
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Snapshot of the owner's name when the record was created.
    pub user_name: String,
    pub user_email: String,
    pub project: String,
    pub task: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub duration_seconds: Option<i64>,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_manual: bool,
    /// Server-local calendar day of `start_time`, fixed at creation.
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TimeRecord {
    pub fn state(&self) -> RecordState {
        match (self.is_running, self.is_paused) {
            (true, true) => RecordState::Paused,
            (true, false) => RecordState::Running,
            (false, _) => RecordState::Stopped,
        }
    }

    /// Seconds counted towards totals; running records count as zero.
    pub fn closed_seconds(&self) -> i64 {
        if self.is_running {
            0
        } else {
            self.duration_seconds.unwrap_or(0)
        }
    }
}

/// Calendar window used by listings and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    #[default]
    #[serde(alias = "none")]
    All,
    Today,
    #[serde(alias = "week")]
    ThisWeek,
    #[serde(alias = "month")]
    ThisMonth,
}

impl DateRange {
    /// Inclusive lower bound relative to `today`, `None` when unbounded.
    pub fn lower_bound(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateRange::All => None,
            DateRange::Today => Some(today),
            DateRange::ThisWeek => Some(start_of_week(today)),
            DateRange::ThisMonth => today.with_day(1),
        }
    }
}

/// Monday of the week containing `day`.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2026-10-16 is a Friday
        assert_eq!(start_of_week(day(2026, 10, 16)), day(2026, 10, 12));
        assert_eq!(start_of_week(day(2026, 10, 12)), day(2026, 10, 12));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(start_of_week(day(2026, 10, 18)), day(2026, 10, 12));
    }

    #[test]
    fn date_range_accepts_short_names() {
        let r: DateRange = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(r, DateRange::ThisWeek);
        let r: DateRange = serde_json::from_str("\"this-month\"").unwrap();
        assert_eq!(r, DateRange::ThisMonth);
        let r: DateRange = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(r, DateRange::All);
    }
}
