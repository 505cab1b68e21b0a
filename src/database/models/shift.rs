use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::Contract;
use crate::error::ValidationError;
use crate::utils::{round_time, serde_seconds};

pub const TAG_MAX_LENGTH: usize = 100;

/// Marks a shift as an absence instead of regular work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftKey {
    #[serde(rename = "S")]
    Sick,
    #[serde(rename = "V")]
    Vacation,
}

impl ShiftKey {
    /// Value stored in the `absence_key` column.
    pub fn code(&self) -> &'static str {
        match self {
            ShiftKey::Sick => "S",
            ShiftKey::Vacation => "V",
        }
    }

    /// Reads the stored column; the empty string means no key.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(ShiftKey::Sick),
            "V" => Some(ShiftKey::Vacation),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftKey::Sick => "Sick",
            ShiftKey::Vacation => "Vacation",
        }
    }
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of a shift. Finished is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ShiftState {
    Open,
    Paused { since: DateTime<Utc> },
    Finished { at: DateTime<Utc> },
}

/// Employees begin and finish shifts to track their work time.
/// A shift may be assigned to one of the employee's contracts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shift {
    /// `None` until the shift has been written to the database.
    pub id: Option<i64>,
    pub employee_id: i64,
    pub contract_id: Option<i64>,
    /// Department of the linked contract.
    #[serde(default)]
    pub department: Option<String>,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub bool_finished: bool,
    #[serde(with = "serde_seconds::option")]
    pub duration: Option<TimeDelta>,
    pub pause_started: Option<DateTime<Utc>>,
    #[serde(with = "serde_seconds")]
    pub pause_duration: TimeDelta,
    pub key: Option<ShiftKey>,
    pub note: String,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

/// Shift fields as submitted by a client for manual entry or correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftInput {
    pub contract_id: Option<i64>,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub key: Option<ShiftKey>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "shift {} of employee {}", id, self.employee_id),
            None => write!(f, "unsaved shift of employee {}", self.employee_id),
        }
    }
}

impl Shift {
    /// A new, unsaved shift starting at `now`.
    pub fn start(employee_id: i64, contract: Option<&Contract>, now: DateTime<Utc>) -> Self {
        Shift {
            id: None,
            employee_id,
            contract_id: contract.map(|c| c.id),
            department: contract.map(|c| c.department.clone()),
            started: now,
            finished: None,
            bool_finished: false,
            duration: None,
            pause_started: None,
            pause_duration: TimeDelta::zero(),
            key: None,
            note: String::new(),
            tags: BTreeSet::new(),
            created_at: now,
        }
    }

    /// A new, unsaved shift built from client input.
    pub fn from_input(employee_id: i64, input: ShiftInput, contract: Option<&Contract>) -> Self {
        let mut shift = Shift::start(employee_id, contract, input.started);
        shift.created_at = Utc::now();
        shift.apply(input, contract);
        shift
    }

    /// Overwrite the editable fields with client input.
    pub fn apply(&mut self, input: ShiftInput, contract: Option<&Contract>) {
        self.contract_id = contract.map(|c| c.id);
        self.department = contract.map(|c| c.department.clone());
        self.started = input.started;
        self.finished = input.finished;
        self.bool_finished = input.finished.is_some();
        self.key = input.key;
        self.note = input.note;
        self.tags = normalize_tags(input.tags);

        if let Some(finished) = self.finished {
            self.close_pause(finished);
        }
    }

    pub fn state(&self) -> ShiftState {
        match (self.finished, self.pause_started) {
            (Some(at), _) => ShiftState::Finished { at },
            (None, Some(since)) => ShiftState::Paused { since },
            (None, None) => ShiftState::Open,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Only a stored shift with a finish time counts as finished.
    pub fn shift_is_finished(&self) -> bool {
        self.id.is_some() && self.finished.is_some()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state(), ShiftState::Paused { .. })
    }

    /// Time elapsed since the shift started. Meaningful while unfinished.
    pub fn current_duration(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.started
    }

    pub fn contract_or_none(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        match self.state() {
            ShiftState::Open => {
                self.pause_started = Some(now);
                Ok(())
            }
            ShiftState::Paused { .. } => Err(ValidationError::new("The shift is already paused.")),
            ShiftState::Finished { .. } => Err(already_finished()),
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        match self.state() {
            ShiftState::Paused { .. } => {
                self.close_pause(now);
                Ok(())
            }
            ShiftState::Open => Err(ValidationError::new("The shift is not paused.")),
            ShiftState::Finished { .. } => Err(already_finished()),
        }
    }

    /// Finish the shift at `now`, ending a running pause first.
    /// Rounding and duration are applied when the shift is saved.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let ShiftState::Finished { .. } = self.state() {
            return Err(already_finished());
        }

        self.close_pause(now);
        self.finished = Some(now);
        self.bool_finished = true;
        Ok(())
    }

    /// Validate that a stored shift does not finish before it started.
    pub fn clean(&self) -> Result<(), ValidationError> {
        if let (true, Some(finished)) = (self.shift_is_finished(), self.finished) {
            if finished < self.started {
                return Err(ValidationError::for_field(
                    "finished",
                    "A shift must not finish, before it has even started!",
                ));
            }
        }
        Ok(())
    }

    /// Round start and finish to the 5-minute grid and recompute the
    /// duration. Runs on every save of a finished shift.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        let Some(finished) = self.finished else {
            return Ok(());
        };

        self.started = round_time(self.started);
        let finished = round_time(finished);
        self.finished = Some(finished);

        if self.started == finished {
            return Err(ValidationError::new(
                "We cannot save a shift that is that short.",
            ));
        }
        if self.started > finished {
            return Err(ValidationError::new(
                "The shift cannot start, after it has already finished.",
            ));
        }

        self.duration = Some(finished - self.started);
        Ok(())
    }

    fn close_pause(&mut self, at: DateTime<Utc>) {
        if let Some(since) = self.pause_started.take() {
            let paused = at - since;
            if paused > TimeDelta::zero() {
                self.pause_duration += paused;
            }
        }
    }
}

fn already_finished() -> ValidationError {
    ValidationError::new("The shift has already been finished.")
}

/// Trim tags and drop empty ones. Over-long tags are cut to the column size.
pub fn normalize_tags(tags: BTreeSet<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|tag| tag.trim().chars().take(TAG_MAX_LENGTH).collect::<String>())
        .filter(|tag| !tag.is_empty())
        .collect()
}
