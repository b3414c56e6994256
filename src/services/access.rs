//! Role gating and per-user scoping.

use uuid::Uuid;

use crate::db::RecordFilter;
use crate::errors::{AppError, AppResult};
use crate::models::user::Role;

/// Authenticated caller, as resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if !self.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }

    pub fn require_employee(&self) -> AppResult<()> {
        if self.role != Role::Employee {
            return Err(AppError::Forbidden("Employee access required".to_string()));
        }
        Ok(())
    }

    /// Narrows `filter` to what the caller may see. Employees are pinned to
    /// their own records; asking for someone else's is forbidden.
    pub fn scope(&self, mut filter: RecordFilter) -> AppResult<RecordFilter> {
        if self.is_admin() {
            return Ok(filter);
        }
        match filter.user_id {
            Some(other) if other != self.user_id => {
                Err(AppError::Forbidden("Cannot access another user's records".to_string()))
            }
            _ => {
                filter.user_id = Some(self.user_id);
                Ok(filter)
            }
        }
    }
}
