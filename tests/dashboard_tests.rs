mod common;

use chrono::Duration;

use common::{harness, manual, october, timer};
use timetrack_backend::errors::AppError;
use timetrack_backend::models::stats::WorkStatus;

#[tokio::test]
async fn one_hour_on_monday_wednesday_friday() {
    let h = harness();
    let (_, admin) = h.admin().await;
    let (_, ada) = h.employee("Ada").await;
    for day in [12, 14, 16] {
        h.state.timers.manual_insert(ada.user_id, manual("Apollo", october(day), 3600)).await.unwrap();
    }

    let stats = h.state.dashboard.admin(&admin).await.unwrap();
    assert_eq!(stats.weekly_total, 3.0);
    assert_eq!(stats.days_this_week, 3);
    assert_eq!(stats.avg_hours_per_day, 1.0);
    assert_eq!(stats.total_hours_today, 1.0);
    assert_eq!(stats.total_team_members, 1);
    assert_eq!(stats.active_users_today, 1);

    let mine = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(mine.weekly_hours, 3.0);
    assert_eq!(mine.days_this_week, 3);
    assert_eq!(mine.avg_hours_per_day, 1.0);
    assert_eq!(mine.productivity_score, 8);
    assert_eq!(mine.current_status, WorkStatus::NotWorking);
}

#[tokio::test]
async fn admin_counts_running_timers_but_not_their_hours() {
    let h = harness();
    let (_, admin) = h.admin().await;
    let (_, ada) = h.employee("Ada").await;
    let (_, bob) = h.employee("Bob").await;
    let (_, eve) = h.employee("Eve").await;

    h.state.timers.start(ada.user_id, timer("Apollo", "Design")).await.unwrap();
    let paused = h.state.timers.start(bob.user_id, timer("Apollo", "Review")).await.unwrap();
    h.state.timers.pause(paused.id, bob.user_id).await.unwrap();
    h.state.timers.manual_insert(eve.user_id, manual("Gemini", october(16), 1800)).await.unwrap();

    h.clock.advance(Duration::hours(2));
    let stats = h.state.dashboard.admin(&admin).await.unwrap();
    assert_eq!(stats.active_timers, 2);
    assert_eq!(stats.total_hours_today, 0.5);
    assert_eq!(stats.active_users_today, 3);
    assert_eq!(stats.total_team_members, 3);
}

#[tokio::test]
async fn timers_started_last_week_still_count_as_active() {
    let h = common::harness_at(october(9));
    let (_, admin) = h.admin().await;
    let (_, ada) = h.employee("Ada").await;
    h.state.timers.start(ada.user_id, timer("Apollo", "Overnight")).await.unwrap();

    h.clock.set(october(16));
    let stats = h.state.dashboard.admin(&admin).await.unwrap();
    assert_eq!(stats.active_timers, 1);
    assert_eq!(stats.weekly_total, 0.0);
    assert_eq!(stats.active_users_today, 0);
}

#[tokio::test]
async fn employee_stats_only_see_own_records() {
    let h = harness();
    let (_, ada) = h.employee("Ada").await;
    let (_, bob) = h.employee("Bob").await;
    h.state.timers.manual_insert(ada.user_id, manual("Apollo", october(16), 7200)).await.unwrap();
    h.state.timers.manual_insert(bob.user_id, manual("Apollo", october(16), 36_000)).await.unwrap();

    let stats = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(stats.today_hours, 2.0);
    assert_eq!(stats.weekly_hours, 2.0);
    assert_eq!(stats.productivity_score, 5);
}

#[tokio::test]
async fn employee_status_tracks_the_active_timer() {
    let h = harness();
    let (_, ada) = h.employee("Ada").await;

    let record = h.state.timers.start(ada.user_id, timer("Apollo", "Design")).await.unwrap();
    let stats = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(stats.current_status, WorkStatus::Working);
    assert_eq!(stats.status_detail, "Working on Design (Apollo)");
    assert_eq!(stats.today_hours, 0.0);

    h.state.timers.pause(record.id, ada.user_id).await.unwrap();
    let stats = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(stats.current_status, WorkStatus::Paused);

    h.clock.advance(Duration::hours(1));
    h.state.timers.stop(record.id, ada.user_id).await.unwrap();
    let stats = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(stats.current_status, WorkStatus::NotWorking);
    assert_eq!(stats.today_hours, 1.0);
}

#[tokio::test]
async fn productivity_saturates_past_forty_hours() {
    let h = harness();
    let (_, ada) = h.employee("Ada").await;
    for day in 12..=16 {
        h.state.timers.manual_insert(ada.user_id, manual("Apollo", october(day), 10 * 3600)).await.unwrap();
    }
    let stats = h.state.dashboard.employee(&ada).await.unwrap();
    assert_eq!(stats.weekly_hours, 50.0);
    assert_eq!(stats.productivity_score, 100);
}

#[tokio::test]
async fn admins_have_no_employee_dashboard() {
    let h = harness();
    let (_, admin) = h.admin().await;
    assert!(matches!(h.state.dashboard.employee(&admin).await, Err(AppError::Forbidden(_))));
}
