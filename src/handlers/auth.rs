use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::identity;
use crate::services::auth::LoginRequest;
use crate::state::AppState;

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = identity(&req, &state)?;
    let profile = state.auth.current_user(&caller).await?;
    Ok(HttpResponse::Ok().json(profile))
}
