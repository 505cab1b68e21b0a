use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{normalize_tags, Contract, Shift, ShiftInput, ShiftState};
use crate::database::repositories::{ContractRepository, ShiftRepository};
use crate::error::ValidationError;

/// A shift transition triggered from the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickAction {
    Start,
    Pause,
    Resume,
    Finish,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickActionRequest {
    pub action: QuickAction,
    pub contract_id: Option<i64>,
    pub note: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractChoice {
    pub id: i64,
    pub department: String,
}

/// What the home page offers: the actions valid right now and, when no
/// shift is running, the contracts a new shift can be booked on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickActionForm {
    pub actions: Vec<QuickAction>,
    pub contracts: Vec<ContractChoice>,
    pub default_contract_id: Option<i64>,
}

impl QuickActionForm {
    pub fn new(
        contracts: &[Contract],
        default_contract: Option<&Contract>,
        current_shift: Option<&Shift>,
    ) -> Self {
        let state = current_shift.map(|s| s.state());
        let actions = match state {
            None | Some(ShiftState::Finished { .. }) => vec![QuickAction::Start],
            Some(ShiftState::Open) => vec![QuickAction::Pause, QuickAction::Finish],
            Some(ShiftState::Paused { .. }) => vec![QuickAction::Resume, QuickAction::Finish],
        };

        let contracts = if actions.contains(&QuickAction::Start) {
            contracts
                .iter()
                .map(|c| ContractChoice {
                    id: c.id,
                    department: c.department.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        QuickActionForm {
            actions,
            contracts,
            default_contract_id: default_contract.map(|c| c.id),
        }
    }
}

#[derive(Clone)]
pub struct ShiftService {
    shift_repository: ShiftRepository,
    contract_repository: ContractRepository,
}

impl ShiftService {
    pub fn new(shift_repository: ShiftRepository, contract_repository: ContractRepository) -> Self {
        Self {
            shift_repository,
            contract_repository,
        }
    }

    pub async fn get_all_contracts(&self, employee_id: i64) -> Result<Vec<Contract>> {
        self.contract_repository.get_all_contracts(employee_id).await
    }

    pub async fn get_default_contract(&self, employee_id: i64) -> Result<Option<Contract>> {
        self.contract_repository
            .get_default_contract(employee_id)
            .await
    }

    pub async fn get_current_shift(&self, employee_id: i64) -> Result<Option<Shift>> {
        self.shift_repository.get_current_shift(employee_id).await
    }

    /// Look up a contract the employee may book shifts on.
    pub async fn resolve_contract(
        &self,
        employee_id: i64,
        contract_id: Option<i64>,
    ) -> Result<Option<Contract>> {
        let Some(contract_id) = contract_id else {
            return Ok(None);
        };

        match self.contract_repository.find_by_id(contract_id).await? {
            Some(contract) if contract.employee_id == employee_id => Ok(Some(contract)),
            _ => Err(ValidationError::for_field(
                "contract_id",
                "Select a valid choice. That contract is not one of your contracts.",
            )
            .into()),
        }
    }

    pub async fn quick_action(
        &self,
        employee_id: i64,
        request: QuickActionRequest,
        now: DateTime<Utc>,
    ) -> Result<Shift> {
        let current = self.shift_repository.get_current_shift(employee_id).await?;

        let mut shift = match request.action {
            QuickAction::Start => {
                if current.is_some() {
                    return Err(ValidationError::new("You already have an active shift.").into());
                }
                let contract = self
                    .resolve_contract(employee_id, request.contract_id)
                    .await?;
                Shift::start(employee_id, contract.as_ref(), now)
            }
            QuickAction::Pause => {
                let mut shift = require_current(current)?;
                shift.pause(now)?;
                shift
            }
            QuickAction::Resume => {
                let mut shift = require_current(current)?;
                shift.resume(now)?;
                shift
            }
            QuickAction::Finish => {
                let mut shift = require_current(current)?;
                shift.finish(now)?;
                shift
            }
        };

        if let Some(note) = request.note {
            shift.note = note;
        }
        if !request.tags.is_empty() {
            shift.tags.extend(normalize_tags(request.tags));
        }

        self.shift_repository.save(&mut shift).await?;
        log::info!("Quick action {:?} on {}", request.action, shift);

        Ok(shift)
    }

    /// Record a shift entered by hand. An unfinished shift becomes the
    /// employee's current shift, so only one may exist at a time.
    pub async fn create_shift(&self, employee_id: i64, input: ShiftInput) -> Result<Shift> {
        if input.finished.is_none()
            && self
                .shift_repository
                .get_current_shift(employee_id)
                .await?
                .is_some()
        {
            return Err(ValidationError::new("You already have an active shift.").into());
        }

        let contract = self.resolve_contract(employee_id, input.contract_id).await?;
        let mut shift = Shift::from_input(employee_id, input, contract.as_ref());

        self.shift_repository.save(&mut shift).await?;
        log::info!("Created {}", shift);

        Ok(shift)
    }

    /// Correct a stored shift. Returns `None` when it does not exist.
    pub async fn update_shift(
        &self,
        employee_id: i64,
        shift_id: i64,
        input: ShiftInput,
    ) -> Result<Option<Shift>> {
        let Some(mut shift) = self.shift_repository.find_by_id(shift_id).await? else {
            return Ok(None);
        };

        if shift.employee_id != employee_id {
            return Ok(None);
        }

        if input.finished.is_none() && shift.is_finished() {
            return Err(ValidationError::for_field(
                "finished",
                "A finished shift cannot be reopened.",
            )
            .into());
        }

        let contract = self.resolve_contract(employee_id, input.contract_id).await?;
        shift.apply(input, contract.as_ref());

        self.shift_repository.save(&mut shift).await?;
        log::info!("Updated {}", shift);

        Ok(Some(shift))
    }
}

fn require_current(current: Option<Shift>) -> Result<Shift, ValidationError> {
    current.ok_or_else(|| ValidationError::new("You have no active shift."))
}
