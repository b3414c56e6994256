use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use log::error;

/// Constraint guarding the "one running record per user" invariant in Postgres.
pub const ACTIVE_RECORD_CONSTRAINT: &str = "time_records_one_active_per_user";
pub const RECORD_PKEY_CONSTRAINT: &str = "time_records_pkey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Validation(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    DuplicateId(String),
    StoreUnavailable(String),
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Transient failures the caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }

    fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::DuplicateId(msg)
            | AppError::StoreUnavailable(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::DuplicateId(msg) => write!(f, "Duplicate Id: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Store Unavailable: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::DuplicateId(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if self.is_retryable() {
            builder.insert_header(("Retry-After", "1"));
        }
        builder.json(ErrorResponse { error: self.message().to_string() })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                error!("Store unavailable: {:?}", err);
                AppError::StoreUnavailable("Record store unavailable, retry later".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(ACTIVE_RECORD_CONSTRAINT) => {
                        AppError::Conflict("User already has an active timer".to_string())
                    }
                    Some(RECORD_PKEY_CONSTRAINT) => {
                        AppError::DuplicateId("Time record id already exists".to_string())
                    }
                    Some(other) => AppError::Conflict(format!("Unique constraint violated: {}", other)),
                    None => AppError::Conflict("Unique constraint violated".to_string()),
                }
            }
            _ => {
                error!("Database error: {:?}", err);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details = err
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let errors = errs
                    .iter()
                    .map(|e| e.code.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: [{}]", field, errors)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(format!("Validation failed: {}", details))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthenticated(format!("Invalid token: {}", err))
    }
}
