use actix_web::{web, HttpResponse, Result};

use crate::database::models::{CreateUserInput, LoginInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::AppState;

pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .auth_service
        .register(request.into_inner())
        .await
        .map_err(|e| {
            log::warn!("Failed to register user: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .auth_service
        .login(request.into_inner())
        .await
        .map_err(|e| {
            log::warn!("Failed to login user: {}", e);
            AppError::Unauthorized
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = state
        .auth_service
        .get_user(claims.user_id())
        .await
        .map_err(|e| {
            log::warn!("Token for unknown user {}: {}", claims.user_id(), e);
            AppError::Unauthorized
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user))))
}
