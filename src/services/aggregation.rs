//! Reduction of time records into dashboard statistics.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::models::stats::{AdminDashboardStats, EmployeeDashboardStats, WorkStatus};
use crate::models::time_record::{start_of_week, RecordState, TimeRecord};

pub const WEEKLY_TARGET_HOURS: f64 = 40.0;

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn hours(seconds: i64) -> f64 {
    round1(seconds as f64 / 3600.0)
}

/// Closed-record sums for the current day and week.
#[derive(Debug, Default, PartialEq)]
struct PeriodTotals {
    today_seconds: i64,
    week_seconds: i64,
    week_days: usize,
}

impl PeriodTotals {
    fn collect<'a>(records: impl IntoIterator<Item = &'a TimeRecord>, today: NaiveDate) -> Self {
        let week_start = start_of_week(today);
        let mut totals = PeriodTotals::default();
        let mut days = HashSet::new();
        for record in records.into_iter().filter(|r| !r.is_running) {
            if record.date == today {
                totals.today_seconds += record.closed_seconds();
            }
            if record.date >= week_start {
                totals.week_seconds += record.closed_seconds();
                days.insert(record.date);
            }
        }
        totals.week_days = days.len();
        totals
    }

    fn weekly_hours(&self) -> f64 {
        hours(self.week_seconds)
    }

    fn avg_hours_per_day(&self) -> f64 {
        round1(self.weekly_hours() / self.week_days.max(1) as f64)
    }
}

/// Team-wide figures. `records` may include running records; they only count
/// towards `active_timers` and `active_users_today`.
pub fn admin_stats(records: &[TimeRecord], today: NaiveDate, team_members: i64) -> AdminDashboardStats {
    let totals = PeriodTotals::collect(records, today);
    let active_users_today: HashSet<_> = records
        .iter()
        .filter(|r| r.date == today)
        .map(|r| r.user_id)
        .collect();

    AdminDashboardStats {
        total_hours_today: hours(totals.today_seconds),
        weekly_total: totals.weekly_hours(),
        active_timers: records.iter().filter(|r| r.is_running).count(),
        active_users_today: active_users_today.len(),
        total_team_members: team_members,
        days_this_week: totals.week_days,
        avg_hours_per_day: totals.avg_hours_per_day(),
    }
}

/// Saturating percentage of the weekly target, 0..=100.
pub fn productivity_score(weekly_hours: f64) -> u32 {
    (weekly_hours * 100.0 / WEEKLY_TARGET_HOURS).clamp(0.0, 100.0).round() as u32
}

pub fn work_status(active: Option<&TimeRecord>) -> (WorkStatus, String) {
    match active.map(|r| (r.state(), r)) {
        Some((RecordState::Running, r)) => (
            WorkStatus::Working,
            format!("Working on {} ({})", r.task, r.project),
        ),
        Some((RecordState::Paused, r)) => {
            (WorkStatus::Paused, format!("Paused: {} ({})", r.task, r.project))
        }
        _ => (WorkStatus::NotWorking, "No active timer".to_string()),
    }
}

/// Figures for one employee. `records` must already be limited to that employee.
pub fn employee_stats(
    records: &[TimeRecord],
    active: Option<&TimeRecord>,
    today: NaiveDate,
) -> EmployeeDashboardStats {
    let totals = PeriodTotals::collect(records, today);
    let weekly_hours = totals.weekly_hours();
    let (current_status, status_detail) = work_status(active);

    EmployeeDashboardStats {
        today_hours: hours(totals.today_seconds),
        weekly_hours,
        days_this_week: totals.week_days,
        avg_hours_per_day: totals.avg_hours_per_day(),
        productivity_score: productivity_score(weekly_hours),
        current_status,
        status_detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        // October 2026: the 12th is a Monday
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn closed(user_id: Uuid, date: NaiveDate, seconds: i64) -> TimeRecord {
        let start = Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap());
        TimeRecord {
            id: Uuid::new_v4(),
            user_id,
            user_name: "Test User".into(),
            user_email: "test@example.com".into(),
            project: "Apollo".into(),
            task: "Build".into(),
            start_time: start,
            end_time: Some(start + Duration::seconds(seconds)),
            duration: None,
            duration_seconds: Some(seconds),
            is_running: false,
            is_paused: false,
            is_manual: false,
            date,
            created_at: start,
        }
    }

    fn running(user_id: Uuid, date: NaiveDate, paused: bool) -> TimeRecord {
        let mut r = closed(user_id, date, 0);
        r.end_time = None;
        r.duration_seconds = None;
        r.is_running = true;
        r.is_paused = paused;
        r.task = "Deploy".into();
        r
    }

    #[test]
    fn mon_wed_fri_hour_each() {
        let user = Uuid::new_v4();
        let records = vec![
            closed(user, day(12), 3600),
            closed(user, day(14), 3600),
            closed(user, day(16), 3600),
        ];
        let stats = admin_stats(&records, day(16), 1);
        assert_eq!(stats.weekly_total, 3.0);
        assert_eq!(stats.days_this_week, 3);
        assert_eq!(stats.avg_hours_per_day, 1.0);
        assert_eq!(stats.total_hours_today, 1.0);
    }

    #[test]
    fn running_records_never_count_towards_hours() {
        let user = Uuid::new_v4();
        let mut with_stale_duration = running(user, day(16), false);
        with_stale_duration.duration_seconds = Some(7200);
        let records = vec![closed(user, day(16), 1800), with_stale_duration];
        let stats = admin_stats(&records, day(16), 1);
        assert_eq!(stats.total_hours_today, 0.5);
        assert_eq!(stats.weekly_total, 0.5);
        assert_eq!(stats.active_timers, 1);
    }

    #[test]
    fn previous_week_is_excluded_from_weekly_total() {
        let user = Uuid::new_v4();
        let records = vec![closed(user, day(11), 3600), closed(user, day(13), 5400)];
        let stats = admin_stats(&records, day(16), 1);
        assert_eq!(stats.weekly_total, 1.5);
        assert_eq!(stats.days_this_week, 1);
        assert_eq!(stats.total_hours_today, 0.0);
    }

    #[test]
    fn empty_week_averages_to_zero() {
        let stats = admin_stats(&[], day(16), 4);
        assert_eq!(stats.avg_hours_per_day, 0.0);
        assert_eq!(stats.days_this_week, 0);
        assert_eq!(stats.total_team_members, 4);
    }

    #[test]
    fn active_users_today_are_distinct() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let records = vec![
            closed(a, day(16), 600),
            closed(a, day(16), 600),
            running(b, day(16), false),
            closed(c, day(15), 600),
        ];
        let stats = admin_stats(&records, day(16), 3);
        assert_eq!(stats.active_users_today, 2);
    }

    #[test]
    fn hours_round_to_one_decimal() {
        let user = Uuid::new_v4();
        // 1h 20m = 1.333.. hours
        let stats = admin_stats(&[closed(user, day(16), 4800)], day(16), 1);
        assert_eq!(stats.total_hours_today, 1.3);
    }

    #[test]
    fn productivity_saturates() {
        assert_eq!(productivity_score(0.0), 0);
        assert_eq!(productivity_score(20.0), 50);
        assert_eq!(productivity_score(40.0), 100);
        assert_eq!(productivity_score(55.5), 100);
        assert_eq!(productivity_score(0.1), 0);
    }

    #[test]
    fn employee_status_follows_active_record() {
        let user = Uuid::new_v4();
        let working = running(user, day(16), false);
        let paused = running(user, day(16), true);

        let stats = employee_stats(&[], Some(&working), day(16));
        assert_eq!(stats.current_status, WorkStatus::Working);
        assert_eq!(stats.status_detail, "Working on Deploy (Apollo)");

        let stats = employee_stats(&[], Some(&paused), day(16));
        assert_eq!(stats.current_status, WorkStatus::Paused);

        let stats = employee_stats(&[], None, day(16));
        assert_eq!(stats.current_status, WorkStatus::NotWorking);
        assert_eq!(stats.status_detail, "No active timer");
    }

    #[test]
    fn employee_weekly_hours_drive_productivity() {
        let user = Uuid::new_v4();
        let records: Vec<_> = (12..=16).map(|d| closed(user, day(d), 8 * 3600)).collect();
        let stats = employee_stats(&records, None, day(16));
        assert_eq!(stats.weekly_hours, 40.0);
        assert_eq!(stats.today_hours, 8.0);
        assert_eq!(stats.days_this_week, 5);
        assert_eq!(stats.avg_hours_per_day, 8.0);
        assert_eq!(stats.productivity_score, 100);
    }
}
