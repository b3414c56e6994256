use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(AppError::Internal(format!("Unknown role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Salted credential hash, never the plaintext password.
    pub password_hash: String,
    pub role: Role,
    pub department: Option<String>,
    pub position: Option<String>,
    /// Zero-padded sequence number, only assigned to employees.
    pub employee_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role,
            department: self.department.clone(),
            position: self.position.clone(),
            employee_number: self.employee_number.clone(),
            created_at: self.created_at,
        }
    }
}

/// Row shape of the `users` table; `role` is stored as text.
#[derive(sqlx::FromRow, Debug)]
pub struct UserRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            department: row.department,
            position: row.position,
            employee_number: row.employee_number,
            created_at: row.created_at,
        })
    }
}

/// User as exposed over the wire, without the credential.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    pub position: Option<String>,
    pub employee_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Formats a sequence value as a 3-digit employee number.
pub fn format_employee_number(seq: i64) -> String {
    format!("{:03}", seq)
}
