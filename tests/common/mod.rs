#![allow(dead_code)]
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use timetrack_backend::db::{MemoryStore, RecordStore};
use timetrack_backend::models::user::{Role, User};
use timetrack_backend::services::access::Identity;
use timetrack_backend::services::timer::{ManualEntry, NewTimer};
use timetrack_backend::state::AppState;
use timetrack_backend::utils::clock::{calendar_date, Clock};
use timetrack_backend::utils::jwt::JwtTokens;
use timetrack_backend::utils::password::{Argon2Credentials, CredentialVerifier};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Clock that only moves when told to.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Noon UTC on the given October 2026 day. The 12th is a Monday.
pub fn october(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
}

pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    calendar_date(ts)
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<TestClock>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub state: AppState,
}

pub fn harness() -> Harness {
    harness_at(october(16))
}

pub fn harness_at(now: DateTime<Utc>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(TestClock::at(now));
    let credentials: Arc<dyn CredentialVerifier> = Arc::new(Argon2Credentials);
    let state = AppState::new(
        store.clone(),
        Arc::new(JwtTokens::new(JWT_SECRET, 1)),
        credentials.clone(),
        clock.clone(),
    );
    Harness { store, clock, credentials, state }
}

impl Harness {
    /// Inserts a user straight into the store; the credential is hashed for real.
    pub async fn user(&self, role: Role, first_name: &str, password: &str) -> User {
        let user = User {
            user_id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            password_hash: self.credentials.hash(password).unwrap(),
            role,
            department: Some("Engineering".to_string()),
            position: None,
            employee_number: None,
            created_at: Utc::now(),
        };
        self.store.create_user(user).await.unwrap()
    }

    pub async fn employee(&self, first_name: &str) -> (User, Identity) {
        let user = self.user(Role::Employee, first_name, "password123").await;
        let identity = Identity { user_id: user.user_id, role: Role::Employee };
        (user, identity)
    }

    pub async fn admin(&self) -> (User, Identity) {
        let user = self.user(Role::Admin, "Root", "password123").await;
        let identity = Identity { user_id: user.user_id, role: Role::Admin };
        (user, identity)
    }
}

pub fn timer(project: &str, task: &str) -> NewTimer {
    NewTimer { project: project.to_string(), task: task.to_string() }
}

pub fn manual(project: &str, start: DateTime<Utc>, seconds: i64) -> ManualEntry {
    ManualEntry {
        project: project.to_string(),
        task: "Manual work".to_string(),
        start_time: start,
        end_time: start + Duration::seconds(seconds),
    }
}
