use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::config::AdminSeed;
use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::user::{Role, User};
use crate::utils::password::CredentialVerifier;

/// Creates the bootstrap admin unless an admin already exists. Returns whether one was created.
pub async fn seed_admin(
    store: &dyn RecordStore,
    credentials: &dyn CredentialVerifier,
    seed: &AdminSeed,
) -> AppResult<bool> {
    if store.count_users(Role::Admin).await? > 0 {
        info!("Admin account present, skipping seed");
        return Ok(false);
    }

    let admin = User {
        user_id: Uuid::new_v4(),
        first_name: seed.first_name.clone(),
        last_name: seed.last_name.clone(),
        email: seed.email.clone(),
        password_hash: credentials.hash(&seed.password)?,
        role: Role::Admin,
        department: None,
        position: None,
        employee_number: None,
        created_at: Utc::now(),
    };
    match store.create_user(admin).await {
        Ok(created) => {
            info!("Seeded admin account {}", created.email);
            Ok(true)
        }
        // another instance seeded it first
        Err(AppError::Conflict(_)) => Ok(false),
        Err(err) => Err(err),
    }
}
