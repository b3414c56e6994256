use async_trait::async_trait;
use log::warn;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use super::{RecordFilter, RecordStore};
use crate::errors::{AppError, AppResult};
use crate::models::time_record::TimeRecord;
use crate::models::user::{Role, User};

/// Bounds every call on the wrapped store; an expired call is `StoreUnavailable`.
pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: RecordStore> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

async fn bounded<T, F>(limit: Duration, op: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Record store call {} timed out after {:?}", op, limit);
            Err(AppError::StoreUnavailable(format!("Record store timed out during {}", op)))
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for TimeoutStore<S> {
    async fn find_active_record(&self, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        bounded(self.limit, "find_active_record", self.inner.find_active_record(user_id)).await
    }

    async fn find_active_records(&self) -> AppResult<Vec<TimeRecord>> {
        bounded(self.limit, "find_active_records", self.inner.find_active_records()).await
    }

    async fn create_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        bounded(self.limit, "create_record", self.inner.create_record(record)).await
    }

    async fn find_record_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        bounded(self.limit, "find_record_by_id", self.inner.find_record_by_id(id, user_id)).await
    }

    async fn update_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        bounded(self.limit, "update_record", self.inner.update_record(record)).await
    }

    async fn query_records(&self, filter: &RecordFilter) -> AppResult<Vec<TimeRecord>> {
        bounded(self.limit, "query_records", self.inner.query_records(filter)).await
    }

    async fn list_projects(&self, user_id: Option<Uuid>) -> AppResult<Vec<String>> {
        bounded(self.limit, "list_projects", self.inner.list_projects(user_id)).await
    }

    async fn create_user(&self, user: User) -> AppResult<User> {
        bounded(self.limit, "create_user", self.inner.create_user(user)).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        bounded(self.limit, "find_user_by_id", self.inner.find_user_by_id(id)).await
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        bounded(self.limit, "find_user_by_email", self.inner.find_user_by_email(email)).await
    }

    async fn list_users(&self, role: Role) -> AppResult<Vec<User>> {
        bounded(self.limit, "list_users", self.inner.list_users(role)).await
    }

    async fn count_users(&self, role: Role) -> AppResult<i64> {
        bounded(self.limit, "count_users", self.inner.count_users(role)).await
    }

    async fn next_employee_number(&self) -> AppResult<i64> {
        bounded(self.limit, "next_employee_number", self.inner.next_employee_number()).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Option<u64>> {
        bounded(self.limit, "delete_user", self.inner.delete_user(id)).await
    }
}
