use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::user::{Role, User};
use crate::services::access::Identity;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User id
    pub role: Role,
    pub exp: usize, // Expiration timestamp
}

/// Issues and verifies bearer tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user: &User) -> AppResult<String>;
    fn verify(&self, token: &str) -> AppResult<Identity>;
}

pub struct JwtTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }
}

impl TokenService for JwtTokens {
    fn issue(&self, user: &User) -> AppResult<String> {
        let claims = Claims {
            sub: user.user_id.to_string(),
            role: user.role,
            exp: (OffsetDateTime::now_utc() + self.ttl).unix_timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AppError::Internal("Token generation error".to_string()))
    }

    fn verify(&self, token: &str) -> AppResult<Identity> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid user ID in token".to_string()))?;
        Ok(Identity { user_id, role: claims.role })
    }
}
