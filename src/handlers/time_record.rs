use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::identity;
use crate::services::records::RecordQuery;
use crate::services::timer::{ManualEntry, NewTimer};
use crate::state::AppState;

pub async fn start_timer(
    req: HttpRequest,
    state: web::Data<AppState>,
    timer: web::Json<NewTimer>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.start(caller.user_id, timer.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

pub async fn pause_timer(
    req: HttpRequest,
    state: web::Data<AppState>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.pause(record_id.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn resume_timer(
    req: HttpRequest,
    state: web::Data<AppState>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.resume(record_id.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn stop_timer(
    req: HttpRequest,
    state: web::Data<AppState>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.stop(record_id.into_inner(), caller.user_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn get_active_timer(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.active(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn create_manual_entry(
    req: HttpRequest,
    state: web::Data<AppState>,
    entry: web::Json<ManualEntry>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let record = state.timers.manual_insert(caller.user_id, entry.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

pub async fn get_my_records(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<RecordQuery>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    caller.require_employee()?;
    let records = state.records.list(&caller, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn get_all_records(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<RecordQuery>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let records = state.records.list_all(&caller, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn get_projects(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let projects = state.records.projects(&caller).await?;
    Ok(HttpResponse::Ok().json(projects))
}
