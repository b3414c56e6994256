use async_trait::async_trait;
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use uuid::Uuid;

use super::{RecordFilter, RecordStore};
use crate::errors::{AppError, AppResult};
use crate::models::time_record::TimeRecord;
use crate::models::user::{Role, User, UserRow};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32, acquire_timeout: Duration) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|err| AppError::Internal(format!("Migration failed: {}", err)))?;
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_active_record(&self, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        let record = sqlx::query_as::<_, TimeRecord>(
            "SELECT * FROM time_records WHERE user_id = $1 AND is_running LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_active_records(&self) -> AppResult<Vec<TimeRecord>> {
        let records = sqlx::query_as::<_, TimeRecord>(
            "SELECT * FROM time_records WHERE is_running ORDER BY start_time DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn create_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        let created = sqlx::query_as::<_, TimeRecord>(
            r#"
            INSERT INTO time_records (
                id, user_id, user_name, user_email, project, task, start_time, end_time,
                duration, duration_seconds, is_running, is_paused, is_manual, date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.user_name)
        .bind(&record.user_email)
        .bind(&record.project)
        .bind(&record.task)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(&record.duration)
        .bind(record.duration_seconds)
        .bind(record.is_running)
        .bind(record.is_paused)
        .bind(record.is_manual)
        .bind(record.date)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_record_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<TimeRecord>> {
        let record = sqlx::query_as::<_, TimeRecord>(
            "SELECT * FROM time_records WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_record(&self, record: TimeRecord) -> AppResult<TimeRecord> {
        // one statement: the duration and the state flip land together or not at all.
        // Closed records are immutable, so a stale write matches no row.
        let updated = sqlx::query_as::<_, TimeRecord>(
            r#"
            UPDATE time_records
            SET end_time = $3, duration = $4, duration_seconds = $5, is_running = $6, is_paused = $7
            WHERE id = $1 AND user_id = $2 AND is_running
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.end_time)
        .bind(&record.duration)
        .bind(record.duration_seconds)
        .bind(record.is_running)
        .bind(record.is_paused)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(record) => Ok(record),
            None => match self.find_record_by_id(record.id, record.user_id).await? {
                Some(_) => Err(AppError::Conflict("Time record is no longer active".to_string())),
                None => Err(AppError::NotFound("Time record not found".to_string())),
            },
        }
    }

    async fn query_records(&self, filter: &RecordFilter) -> AppResult<Vec<TimeRecord>> {
        let mut query_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM time_records WHERE TRUE");

        if let Some(user_id) = filter.user_id {
            query_builder.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(from) = filter.date_from {
            query_builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query_builder.push(" AND date <= ").push_bind(to);
        }
        if let Some(project) = &filter.project {
            query_builder.push(" AND project = ").push_bind(project.clone());
        }
        if filter.exclude_running {
            query_builder.push(" AND NOT is_running");
        }
        query_builder.push(" ORDER BY start_time DESC");

        let records = query_builder
            .build_query_as::<TimeRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn list_projects(&self, user_id: Option<Uuid>) -> AppResult<Vec<String>> {
        let projects = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT project FROM time_records WHERE ($1::uuid IS NULL OR user_id = $1) ORDER BY project",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn create_user(&self, user: User) -> AppResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, first_name, last_name, email, password_hash, role,
                department, position, employee_number, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.department)
        .bind(&user.position)
        .bind(&user.employee_number)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list_users(&self, role: Role) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC")
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn count_users(&self, role: Role) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn next_employee_number(&self) -> AppResult<i64> {
        let next = sqlx::query_scalar::<_, i64>("SELECT nextval('employee_number_seq')")
            .fetch_one(&self.pool)
            .await?;
        Ok(next)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;
        let records = sqlx::query("DELETE FROM time_records WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let users = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if users.rows_affected() == 0 {
            // dropping the transaction rolls it back
            return Ok(None);
        }
        tx.commit().await?;
        Ok(Some(records.rows_affected()))
    }
}
