use actix_web::{web, HttpResponse, Result};
use chrono::Utc;

use crate::database::models::ShiftInput;
use crate::database::repositories::ShiftRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{Claims, QuickActionRequest};
use crate::AppState;

pub async fn create_shift(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse, AppError> {
    let shift = state
        .shift_service
        .create_shift(claims.user_id(), input.into_inner())
        .await
        .map_err(|e| {
            log::warn!("Failed to create shift: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Created().json(ApiResponse::success(shift)))
}

pub async fn get_shifts(
    claims: Claims,
    repo: web::Data<ShiftRepository>,
) -> Result<HttpResponse, AppError> {
    let shifts = repo
        .get_shifts_by_employee(claims.user_id())
        .await
        .map_err(|e| {
            log::error!("Failed to fetch shifts: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shifts)))
}

pub async fn get_current_shift(
    claims: Claims,
    repo: web::Data<ShiftRepository>,
) -> Result<HttpResponse, AppError> {
    let shift = repo
        .get_current_shift(claims.user_id())
        .await
        .map_err(|e| {
            log::error!("Failed to fetch current shift: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn get_shift(
    claims: Claims,
    repo: web::Data<ShiftRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let shift_id = path.into_inner();

    let shift = repo
        .find_by_id(shift_id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch shift {}: {}", shift_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

    if shift.employee_id != claims.user_id() {
        return Err(AppError::Forbidden(
            "You do not have access to this shift".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn update_shift(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<ShiftInput>,
) -> Result<HttpResponse, AppError> {
    let shift_id = path.into_inner();

    let shift = state
        .shift_service
        .update_shift(claims.user_id(), shift_id, input.into_inner())
        .await
        .map_err(|e| {
            log::warn!("Failed to update shift {}: {}", shift_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}

pub async fn quick_action(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<QuickActionRequest>,
) -> Result<HttpResponse, AppError> {
    let shift = state
        .shift_service
        .quick_action(claims.user_id(), input.into_inner(), Utc::now())
        .await
        .map_err(|e| {
            log::warn!("Quick action failed for user {}: {}", claims.user_id(), e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(shift)))
}
