//! Timer lifecycle: Idle -> Running <-> Paused -> Stopped, plus manual entries.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;
use validator::Validate;

use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::time_record::{RecordState, TimeRecord};
use crate::models::user::User;
use crate::utils::clock::{calendar_date, Clock};
use crate::utils::duration::{elapsed_seconds, format_duration};
use crate::utils::validation::{validate_not_blank, validate_payload};

#[derive(Deserialize, Validate, Debug, Clone)]
pub struct NewTimer {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub project: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub task: String,
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntry {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub project: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub task: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One async mutex per user so timer transitions for the same user run one at a time.
#[derive(Default)]
struct UserLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    const PRUNE_ABOVE: usize = 1024;

    async fn acquire(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if locks.len() > Self::PRUNE_ABOVE {
                locks.retain(|_, l| Arc::strong_count(l) > 1);
            }
            locks.entry(user_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

pub struct TimerService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    locks: UserLocks,
}

impl TimerService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock, locks: UserLocks::default() }
    }

    async fn owner(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn owned_record(&self, record_id: Uuid, user_id: Uuid) -> AppResult<TimeRecord> {
        self.store
            .find_record_by_id(record_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Time record not found".to_string()))
    }

    pub async fn active(&self, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        self.store.find_active_record(user_id).await
    }

    pub async fn start(&self, user_id: Uuid, timer: NewTimer) -> AppResult<TimeRecord> {
        validate_payload(&timer)?;
        let user = self.owner(user_id).await?;

        let _guard = self.locks.acquire(user_id).await;
        if self.store.find_active_record(user_id).await?.is_some() {
            return Err(AppError::Conflict("A timer is already running".to_string()));
        }

        let now = self.clock.now();
        let record = TimeRecord {
            id: Uuid::new_v4(),
            user_id,
            user_name: user.full_name(),
            user_email: user.email.clone(),
            project: timer.project.trim().to_string(),
            task: timer.task.trim().to_string(),
            start_time: now,
            end_time: None,
            duration: None,
            duration_seconds: None,
            is_running: true,
            is_paused: false,
            is_manual: false,
            date: calendar_date(now),
            created_at: now,
        };
        let created = self.store.create_record(record).await?;
        info!("Timer {} started for user {}", created.id, user_id);
        Ok(created)
    }

    /// Sets the paused flag. Repeated calls and calls on stopped records change nothing.
    pub async fn pause(&self, record_id: Uuid, user_id: Uuid) -> AppResult<TimeRecord> {
        self.set_paused(record_id, user_id, true).await
    }

    pub async fn resume(&self, record_id: Uuid, user_id: Uuid) -> AppResult<TimeRecord> {
        self.set_paused(record_id, user_id, false).await
    }

    async fn set_paused(&self, record_id: Uuid, user_id: Uuid, paused: bool) -> AppResult<TimeRecord> {
        let _guard = self.locks.acquire(user_id).await;
        let mut record = self.owned_record(record_id, user_id).await?;
        if !record.is_running || record.is_paused == paused {
            debug!("Timer {} left as {:?}", record_id, record.state());
            return Ok(record);
        }
        record.is_paused = paused;
        let updated = self.store.update_record(record).await?;
        info!("Timer {} is now {:?}", record_id, updated.state());
        Ok(updated)
    }

    /// Closes a running or paused record. Stopping a stopped record returns it untouched.
    pub async fn stop(&self, record_id: Uuid, user_id: Uuid) -> AppResult<TimeRecord> {
        let _guard = self.locks.acquire(user_id).await;
        let mut record = self.owned_record(record_id, user_id).await?;
        if record.state() == RecordState::Stopped {
            debug!("Timer {} already stopped", record_id);
            return Ok(record);
        }

        let now = self.clock.now();
        let seconds = elapsed_seconds(record.start_time, now).unwrap_or_else(|_| {
            warn!(
                "Clock skew on timer {}: stop time {} precedes start {}, clamping to 0",
                record_id, now, record.start_time
            );
            0
        });
        record.end_time = Some(now);
        record.duration = Some(format_duration(seconds));
        record.duration_seconds = Some(seconds as i64);
        record.is_running = false;
        record.is_paused = false;

        let updated = self.store.update_record(record).await?;
        info!("Timer {} stopped after {}s", record_id, seconds);
        Ok(updated)
    }

    /// Records a closed entry directly. Does not consult or block on the running timer.
    pub async fn manual_insert(&self, user_id: Uuid, entry: ManualEntry) -> AppResult<TimeRecord> {
        validate_payload(&entry)?;
        let seconds = elapsed_seconds(entry.start_time, entry.end_time)?;
        let user = self.owner(user_id).await?;

        let record = TimeRecord {
            id: Uuid::new_v4(),
            user_id,
            user_name: user.full_name(),
            user_email: user.email.clone(),
            project: entry.project.trim().to_string(),
            task: entry.task.trim().to_string(),
            start_time: entry.start_time,
            end_time: Some(entry.end_time),
            duration: Some(format_duration(seconds)),
            duration_seconds: Some(seconds as i64),
            is_running: false,
            is_paused: false,
            is_manual: true,
            date: calendar_date(entry.start_time),
            created_at: self.clock.now(),
        };
        let created = self.store.create_record(record).await?;
        info!("Manual entry {} recorded for user {} ({}s)", created.id, user_id, seconds);
        Ok(created)
    }
}
