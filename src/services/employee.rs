use chrono::Utc;
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::user::{format_employee_number, Role, User, UserProfile};
use crate::services::access::Identity;
use crate::utils::password::CredentialVerifier;
use crate::utils::validation::{validate_not_blank, validate_payload};

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub first_name: String,
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 64))]
    pub password: String,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
}

/// Admin-only management of employee accounts.
pub struct EmployeeService {
    store: Arc<dyn RecordStore>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn RecordStore>, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self { store, credentials }
    }

    pub async fn list(&self, identity: &Identity) -> AppResult<Vec<UserProfile>> {
        identity.require_admin()?;
        let employees = self.store.list_users(Role::Employee).await?;
        Ok(employees.iter().map(User::profile).collect())
    }

    pub async fn add(&self, identity: &Identity, new_employee: NewEmployee) -> AppResult<UserProfile> {
        identity.require_admin()?;
        validate_payload(&new_employee)?;

        if self.store.find_user_by_email(&new_employee.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self.credentials.hash(&new_employee.password)?;
        let seq = self.store.next_employee_number().await?;
        let user = User {
            user_id: Uuid::new_v4(),
            first_name: new_employee.first_name.trim().to_string(),
            last_name: new_employee.last_name.trim().to_string(),
            email: new_employee.email.trim().to_string(),
            password_hash,
            role: Role::Employee,
            department: new_employee.department,
            position: new_employee.position,
            employee_number: Some(format_employee_number(seq)),
            created_at: Utc::now(),
        };
        let created = self.store.create_user(user).await?;
        info!(
            "Employee {} created with number {}",
            created.user_id,
            created.employee_number.as_deref().unwrap_or("-")
        );
        Ok(created.profile())
    }

    /// Removes an employee and every time record they own.
    pub async fn delete(&self, identity: &Identity, employee_id: Uuid) -> AppResult<()> {
        identity.require_admin()?;
        let user = self
            .store
            .find_user_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        if user.role != Role::Employee {
            return Err(AppError::Forbidden("Only employee accounts can be deleted".to_string()));
        }

        let removed_records = self
            .store
            .delete_user(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
        info!("Employee {} deleted with {} time records", employee_id, removed_records);
        Ok(())
    }
}
