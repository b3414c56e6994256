pub mod memory;
pub mod postgres;
pub mod timeout;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::time_record::{DateRange, TimeRecord};
use crate::models::user::{Role, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use timeout::TimeoutStore;

/// Narrowing applied to historical record queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub user_id: Option<Uuid>,
    /// Inclusive bounds on the record's calendar date.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub project: Option<String>,
    pub exclude_running: bool,
}

impl RecordFilter {
    pub fn closed() -> Self {
        Self { exclude_running: true, ..Self::default() }
    }

    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn in_range(mut self, range: DateRange, today: NaiveDate) -> Self {
        self.date_from = range.lower_bound(today);
        self.date_to = match range {
            DateRange::Today => Some(today),
            _ => None,
        };
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project.filter(|p| !p.is_empty());
        self
    }

    pub fn matches(&self, record: &TimeRecord) -> bool {
        self.user_id.map_or(true, |id| record.user_id == id)
            && self.date_from.map_or(true, |from| record.date >= from)
            && self.date_to.map_or(true, |to| record.date <= to)
            && self.project.as_deref().map_or(true, |p| record.project == p)
            && !(self.exclude_running && record.is_running)
    }
}

/// Persistence of users and time records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_active_record(&self, user_id: Uuid) -> AppResult<Option<TimeRecord>>;
    /// Running or paused records of every user.
    async fn find_active_records(&self) -> AppResult<Vec<TimeRecord>>;
    /// Fails with `DuplicateId` on id collision and `Conflict` when a running
    /// record would join an existing one for the same user.
    async fn create_record(&self, record: TimeRecord) -> AppResult<TimeRecord>;
    async fn find_record_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<TimeRecord>>;
    /// Only running records accept writes; a closed one yields `Conflict`.
    async fn update_record(&self, record: TimeRecord) -> AppResult<TimeRecord>;
    /// Newest first by start time.
    async fn query_records(&self, filter: &RecordFilter) -> AppResult<Vec<TimeRecord>>;
    async fn list_projects(&self, user_id: Option<Uuid>) -> AppResult<Vec<String>>;

    async fn create_user(&self, user: User) -> AppResult<User>;
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Case-insensitive match.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self, role: Role) -> AppResult<Vec<User>>;
    async fn count_users(&self, role: Role) -> AppResult<i64>;
    /// Atomically hands out the next employee sequence value, starting at 1.
    async fn next_employee_number(&self) -> AppResult<i64>;
    /// Removes the user and every record they own in one write. Returns the
    /// number of records removed, or `None` when no such user exists.
    async fn delete_user(&self, id: Uuid) -> AppResult<Option<u64>>;
}
