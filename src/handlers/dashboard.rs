use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::identity;
use crate::state::AppState;

pub async fn admin_stats(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let stats = state.dashboard.admin(&caller).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn employee_stats(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let stats = state.dashboard.employee(&caller).await?;
    Ok(HttpResponse::Ok().json(stats))
}
