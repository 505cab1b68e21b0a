use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{Contract, Shift};
use crate::error::AppError;
use crate::services::{Claims, QuickActionForm};
use crate::utils::split_micros;
use crate::AppState;

pub const FRONTEND_TEMPLATE: &str = "pages/frontend/index.html";
pub const BACKEND_TEMPLATE: &str = "pages/backend/index.html";

/// Render context of the home page. Keys that do not apply to the
/// visitor are left out entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HomeContext {
    pub template_to_render: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_contracts: Option<Vec<Contract>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_contract: Option<Contract>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<QuickActionForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_closed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_shift: Option<Shift>,
    /// Whole seconds since the current shift started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_duration_wp: Option<i64>,
    /// Sub-second remainder of `current_duration_wp`, in microseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_duration_wp_ms: Option<i64>,
}

impl HomeContext {
    pub fn anonymous() -> Self {
        HomeContext {
            template_to_render: FRONTEND_TEMPLATE.to_string(),
            ..Default::default()
        }
    }

    pub fn for_employee(
        all_contracts: Vec<Contract>,
        default_contract: Option<Contract>,
        current_shift: Option<Shift>,
        now: DateTime<Utc>,
    ) -> Self {
        let form = QuickActionForm::new(
            &all_contracts,
            default_contract.as_ref(),
            current_shift.as_ref(),
        );

        let mut context = HomeContext {
            template_to_render: BACKEND_TEMPLATE.to_string(),
            all_contracts: Some(all_contracts),
            default_contract,
            form: Some(form),
            ..Default::default()
        };

        if let Some(shift) = current_shift {
            // Both elapsed values come from the same instant
            let elapsed = shift.current_duration(now);
            let (seconds, micros) = split_micros(elapsed);

            context.shift_closed = Some(true);
            context.shift_paused = Some(shift.is_paused());
            context.current_duration = Some(seconds);
            context.current_duration_wp = Some(seconds);
            context.current_duration_wp_ms = Some(micros);
            context.current_shift = Some(shift);

            // Hide the contract selection while a shift is running
            context.all_contracts = None;
        }

        context
    }
}

pub async fn home(
    claims: Option<Claims>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let Some(claims) = claims else {
        return Ok(HttpResponse::Ok().json(HomeContext::anonymous()));
    };

    let employee_id = claims.user_id();
    let shifts = &state.shift_service;

    let all_contracts = shifts.get_all_contracts(employee_id).await.map_err(|e| {
        log::error!("Failed to load contracts for user {}: {}", employee_id, e);
        AppError::from(e)
    })?;
    let default_contract = shifts.get_default_contract(employee_id).await?;
    let current_shift = shifts.get_current_shift(employee_id).await.map_err(|e| {
        log::error!("Failed to load current shift for user {}: {}", employee_id, e);
        AppError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(HomeContext::for_employee(
        all_contracts,
        default_contract,
        current_shift,
        Utc::now(),
    )))
}
