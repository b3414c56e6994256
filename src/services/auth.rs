use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::user::UserProfile;
use crate::services::access::Identity;
use crate::utils::jwt::TokenService;
use crate::utils::password::CredentialVerifier;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate, Debug)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

pub struct AuthService {
    store: Arc<dyn RecordStore>,
    tokens: Arc<dyn TokenService>,
    credentials: Arc<dyn CredentialVerifier>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        tokens: Arc<dyn TokenService>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self { store, tokens, credentials }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        validate_payload(&request)?;
        let invalid = || AppError::Unauthenticated("Invalid email or password".to_string());

        let user = self
            .store
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;
        if !self.credentials.verify(&request.password, &user.password_hash)? {
            warn!("Failed login attempt for user {}", user.user_id);
            return Err(invalid());
        }

        let token = self.tokens.issue(&user)?;
        info!("User {} logged in as {}", user.user_id, user.role);
        Ok(LoginResponse { token, user: user.profile() })
    }

    /// Resolves a bearer token into the caller's identity.
    pub fn authenticate(&self, token: Option<&str>) -> AppResult<Identity> {
        let token = token.ok_or_else(|| AppError::Unauthenticated("Missing token".to_string()))?;
        self.tokens.verify(token)
    }

    pub async fn current_user(&self, identity: &Identity) -> AppResult<UserProfile> {
        self.store
            .find_user_by_id(identity.user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::Unauthenticated("User not found".to_string()))
    }
}
