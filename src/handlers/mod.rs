pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod time_record;

use actix_web::{web, HttpRequest};

use crate::errors::{AppError, AppResult};
use crate::services::access::Identity;
use crate::state::AppState;

/// Resolves the bearer token of `req` into the caller's identity.
pub fn identity(req: &HttpRequest, state: &AppState) -> AppResult<Identity> {
    let token = req.headers().get("Authorization")
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim);
    state.auth.authenticate(token)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| AppError::Validation(err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _| AppError::Validation(err.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _| AppError::Validation(err.to_string()).into()))
        .service(
            web::resource("/v1/auth/login")
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/v1/auth/me")
                .route(web::get().to(auth::me)),
        )
        .service(
            web::resource("/v1/employees")
                .route(web::get().to(employee::get_employees))
                .route(web::post().to(employee::create_employee)),
        )
        .service(
            web::resource("/v1/employees/{id}")
                .route(web::delete().to(employee::delete_employee)),
        )
        .service(
            web::resource("/v1/admin/records")
                .route(web::get().to(time_record::get_all_records)),
        )
        .service(
            web::resource("/v1/admin/stats")
                .route(web::get().to(dashboard::admin_stats)),
        )
        .service(
            web::resource("/v1/employee/stats")
                .route(web::get().to(dashboard::employee_stats)),
        )
        .service(
            web::resource("/v1/records")
                .route(web::get().to(time_record::get_my_records)),
        )
        .service(
            web::resource("/v1/records/manual")
                .route(web::post().to(time_record::create_manual_entry)),
        )
        .service(
            web::resource("/v1/projects")
                .route(web::get().to(time_record::get_projects)),
        )
        .service(
            web::resource("/v1/timer/active")
                .route(web::get().to(time_record::get_active_timer)),
        )
        .service(
            web::resource("/v1/timer/start")
                .route(web::post().to(time_record::start_timer)),
        )
        .service(
            web::resource("/v1/timer/{id}/pause")
                .route(web::post().to(time_record::pause_timer)),
        )
        .service(
            web::resource("/v1/timer/{id}/resume")
                .route(web::post().to(time_record::resume_timer)),
        )
        .service(
            web::resource("/v1/timer/{id}/stop")
                .route(web::post().to(time_record::stop_timer)),
        );
}
