use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upper bounds for numeric settings; zero is rejected for all of them.
const MAX_JWT_TTL_DAYS: u64 = 3650;
const MAX_STORE_TIMEOUT_MS: u64 = 600_000;

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    EnvVarNotFound(String),
    InvalidValue(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarNotFound(var) => write!(f, "{} must be set", var),
            ConfigError::InvalidValue(var, value) => write!(f, "Invalid value for {}: {:?}", var, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::InvalidValue("STORE_BACKEND".to_string(), other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub store_timeout: Duration,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from any variable source; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let parse = |var: &str, default: u64, max: u64| -> Result<u64, ConfigError> {
            match get(var) {
                Some(value) => match value.parse::<u64>() {
                    Ok(n) if (1..=max).contains(&n) => Ok(n),
                    _ => Err(ConfigError::InvalidValue(var.to_string(), value)),
                },
                None => Ok(default),
            }
        };

        let jwt_secret = get("JWT_SECRET").ok_or_else(|| ConfigError::EnvVarNotFound("JWT_SECRET".to_string()))?;
        let store_backend = match get("STORE_BACKEND") {
            Some(value) => value.parse()?,
            None => StoreBackend::Postgres,
        };
        let database_url = get("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::EnvVarNotFound("DATABASE_URL".to_string()));
        }

        let admin_seed = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                email,
                password,
                first_name: get("ADMIN_FIRST_NAME").unwrap_or_else(|| "Admin".to_string()),
                last_name: get("ADMIN_LAST_NAME").unwrap_or_else(|| "User".to_string()),
            }),
            _ => None,
        };

        Ok(AppConfig {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            store_backend,
            database_url,
            db_max_connections: parse("DB_MAX_CONNECTIONS", 10, u64::from(u32::MAX))? as u32,
            store_timeout: Duration::from_millis(parse(
                "STORE_TIMEOUT_MS",
                5000,
                MAX_STORE_TIMEOUT_MS,
            )?),
            jwt_secret,
            jwt_ttl_days: parse("JWT_TTL_DAYS", 7, MAX_JWT_TTL_DAYS)? as i64,
            admin_seed,
        })
    }
}
