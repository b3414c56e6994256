use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordFilter, RecordStore};
use crate::errors::{AppError, AppResult};
use crate::models::time_record::TimeRecord;
use crate::models::user::{Role, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    records: HashMap<Uuid, TimeRecord>,
}

/// In-process store. Every mutation runs under one write lock, so the
/// running-record check and the insert are a single step.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    employee_seq: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_active_record(&self, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .values()
            .find(|r| r.user_id == user_id && r.is_running)
            .cloned())
    }

    async fn find_active_records(&self) -> AppResult<Vec<TimeRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.records.values().filter(|r| r.is_running).cloned().collect())
    }

    async fn create_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        let mut tables = self.tables.write().await;
        if tables.records.contains_key(&record.id) {
            return Err(AppError::DuplicateId(format!("Time record {} already exists", record.id)));
        }
        if record.is_running
            && tables
                .records
                .values()
                .any(|r| r.user_id == record.user_id && r.is_running)
        {
            return Err(AppError::Conflict("User already has an active timer".to_string()));
        }
        tables.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_record_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .records
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn update_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        let mut tables = self.tables.write().await;
        match tables.records.get_mut(&record.id) {
            Some(existing) if existing.user_id == record.user_id => {
                if !existing.is_running {
                    return Err(AppError::Conflict("Time record is no longer active".to_string()));
                }
                *existing = record.clone();
                Ok(record)
            }
            _ => Err(AppError::NotFound("Time record not found".to_string())),
        }
    }

    async fn query_records(&self, filter: &RecordFilter) -> AppResult<Vec<TimeRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<TimeRecord> = tables
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(records)
    }

    async fn list_projects(&self, user_id: Option<Uuid>) -> AppResult<Vec<String>> {
        let tables = self.tables.read().await;
        let projects: BTreeSet<String> = tables
            .records
            .values()
            .filter(|r| user_id.map_or(true, |id| r.user_id == id))
            .map(|r| r.project.clone())
            .collect();
        Ok(projects.into_iter().collect())
    }

    async fn create_user(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.user_id) {
            return Err(AppError::DuplicateId(format!("User {} already exists", user.user_id)));
        }
        let email = user.email.to_lowercase();
        if tables.users.values().any(|u| u.email.to_lowercase() == email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        if let Some(number) = &user.employee_number {
            if tables
                .users
                .values()
                .any(|u| u.employee_number.as_ref() == Some(number))
            {
                return Err(AppError::Conflict("Employee number already exists".to_string()));
            }
        }
        tables.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.to_lowercase() == email)
            .cloned())
    }

    async fn list_users(&self, role: Role) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn count_users(&self, role: Role) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.role == role).count() as i64)
    }

    async fn next_employee_number(&self) -> AppResult<i64> {
        Ok(self.employee_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Option<u64>> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(None);
        }
        let before = tables.records.len();
        tables.records.retain(|_, r| r.user_id != id);
        Ok(Some((before - tables.records.len()) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn running(user_id: Uuid) -> TimeRecord {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        TimeRecord {
            id: Uuid::new_v4(),
            user_id,
            user_name: "Ada Lovelace".to_string(),
            user_email: "ada@example.com".to_string(),
            project: "Apollo".to_string(),
            task: "Guidance".to_string(),
            start_time: start,
            end_time: None,
            duration: None,
            duration_seconds: None,
            is_running: true,
            is_paused: false,
            is_manual: false,
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            created_at: start,
        }
    }

    fn stopped(mut record: TimeRecord) -> TimeRecord {
        record.end_time = Some(record.start_time + chrono::Duration::seconds(90));
        record.duration = Some("1m 30s".to_string());
        record.duration_seconds = Some(90);
        record.is_running = false;
        record.is_paused = false;
        record
    }

    #[tokio::test]
    async fn stopped_record_rejects_later_writes() {
        let store = MemoryStore::new();
        let record = store.create_record(running(Uuid::new_v4())).await.unwrap();
        let closed = store.update_record(stopped(record.clone())).await.unwrap();

        let mut stale = record.clone();
        stale.is_paused = true;
        let err = store.update_record(stale).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = store.find_record_by_id(record.id, record.user_id).await.unwrap().unwrap();
        assert_eq!(stored, closed);
    }

    #[tokio::test]
    async fn update_of_foreign_record_is_not_found() {
        let store = MemoryStore::new();
        let record = store.create_record(running(Uuid::new_v4())).await.unwrap();
        let mut foreign = record.clone();
        foreign.user_id = Uuid::new_v4();
        assert!(matches!(store.update_record(foreign).await, Err(AppError::NotFound(_))));
    }
}
