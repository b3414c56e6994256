use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::identity;
use crate::services::employee::NewEmployee;
use crate::state::AppState;

pub async fn get_employees(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let employees = state.employees.list(&caller).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn create_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    new_employee: web::Json<NewEmployee>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let employee = state.employees.add(&caller, new_employee.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

pub async fn delete_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    employee_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    state.employees.delete(&caller, employee_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}
