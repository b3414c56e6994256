use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};
use std::sync::Arc;

use timetrack_backend::config::{AppConfig, StoreBackend};
use timetrack_backend::db::{MemoryStore, PgStore, RecordStore, TimeoutStore};
use timetrack_backend::handlers;
use timetrack_backend::services::seed::seed_admin;
use timetrack_backend::state::AppState;
use timetrack_backend::utils::clock::SystemClock;
use timetrack_backend::utils::jwt::JwtTokens;
use timetrack_backend::utils::password::{Argon2Credentials, CredentialVerifier};

fn startup_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    error!("Startup failed: {}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

async fn open_store(config: &AppConfig) -> std::io::Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory record store");
            Ok(Arc::new(TimeoutStore::new(MemoryStore::new(), config.store_timeout)))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| startup_error("DATABASE_URL must be set"))?;
            let store = PgStore::connect(database_url, config.db_max_connections, config.store_timeout)
                .await
                .map_err(startup_error)?;
            store.migrate().await.map_err(startup_error)?;
            Ok(Arc::new(TimeoutStore::new(store, config.store_timeout)))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(startup_error)?;
    let store = open_store(&config).await?;
    let credentials: Arc<dyn CredentialVerifier> = Arc::new(Argon2Credentials);

    if let Some(seed) = &config.admin_seed {
        seed_admin(store.as_ref(), credentials.as_ref(), seed)
            .await
            .map_err(startup_error)?;
    }

    let state = web::Data::new(AppState::new(
        store,
        Arc::new(JwtTokens::new(&config.jwt_secret, config.jwt_ttl_days)),
        credentials,
        Arc::new(SystemClock),
    ));

    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::routes)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
