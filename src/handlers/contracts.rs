use actix_web::{web, HttpResponse, Result};

use crate::database::models::{Contract, ContractInput};
use crate::database::repositories::ContractRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

/// Fetch a contract and make sure the caller owns it.
async fn owned_contract(
    repo: &ContractRepository,
    claims: &Claims,
    contract_id: i64,
) -> Result<Contract, AppError> {
    let contract = repo
        .find_by_id(contract_id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch contract {}: {}", contract_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;

    if contract.employee_id != claims.user_id() {
        return Err(AppError::Forbidden(
            "You do not have access to this contract".to_string(),
        ));
    }

    Ok(contract)
}

pub async fn create_contract(
    claims: Claims,
    repo: web::Data<ContractRepository>,
    input: web::Json<ContractInput>,
) -> Result<HttpResponse, AppError> {
    let contract = input.into_inner().clean()?;

    let contract = repo
        .create_contract(claims.user_id(), contract)
        .await
        .map_err(|e| {
            log::error!("Failed to create contract: {}", e);
            AppError::from(e)
        })?;

    log::info!(
        "Created contract {} for user {}",
        contract.id,
        contract.employee_id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(contract)))
}

pub async fn get_contracts(
    claims: Claims,
    repo: web::Data<ContractRepository>,
) -> Result<HttpResponse, AppError> {
    let contracts = repo
        .get_all_contracts(claims.user_id())
        .await
        .map_err(|e| {
            log::error!("Failed to fetch contracts: {}", e);
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(contracts)))
}

pub async fn get_contract(
    claims: Claims,
    repo: web::Data<ContractRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let contract = owned_contract(&repo, &claims, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(contract)))
}

pub async fn update_contract(
    claims: Claims,
    repo: web::Data<ContractRepository>,
    path: web::Path<i64>,
    input: web::Json<ContractInput>,
) -> Result<HttpResponse, AppError> {
    let contract_id = path.into_inner();
    owned_contract(&repo, &claims, contract_id).await?;

    let contract = input.into_inner().clean()?;

    let updated = repo
        .update_contract(contract_id, contract)
        .await
        .map_err(|e| {
            log::error!("Failed to update contract {}: {}", contract_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

pub async fn delete_contract(
    claims: Claims,
    repo: web::Data<ContractRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let contract_id = path.into_inner();
    owned_contract(&repo, &claims, contract_id).await?;

    let deleted = repo.delete_contract(contract_id).await.map_err(|e| {
        log::error!("Failed to delete contract {}: {}", contract_id, e);
        AppError::from(e)
    })?;

    if !deleted {
        return Err(AppError::NotFound("Contract not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Contract deleted successfully",
    )))
}
