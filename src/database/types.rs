use std::collections::BTreeSet;

use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};

use super::models::{Contract, Shift, ShiftKey, WorkingHours};

// Database row types that match the exact SQLite schema
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContractRow {
    pub id: i64,
    pub department: String,
    pub department_short: Option<String>,
    pub hours_minutes: i64,
    pub contact: String,
    pub created_at: DateTime<Utc>,
    pub employee_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShiftRow {
    pub id: i64,
    pub employee_id: i64,
    pub contract_id: Option<i64>,
    pub department: Option<String>,
    pub started: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub bool_finished: bool,
    pub duration_seconds: Option<i64>,
    pub pause_started: Option<DateTime<Utc>>,
    pub pause_seconds: i64,
    pub absence_key: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShiftTagRow {
    pub shift_id: i64,
    pub name: String,
}

// Conversion functions
impl From<ContractRow> for Contract {
    fn from(row: ContractRow) -> Self {
        Self {
            id: row.id,
            department: row.department,
            department_short: row.department_short,
            hours: WorkingHours::from_minutes(row.hours_minutes),
            contact: Some(row.contact).filter(|c| !c.is_empty()),
            created_at: row.created_at,
            employee_id: row.employee_id,
        }
    }
}

/// Stored second counts outside the range of `TimeDelta` mean a corrupt row.
fn stored_span(column: &str, shift_id: i64, seconds: i64) -> anyhow::Result<TimeDelta> {
    TimeDelta::try_seconds(seconds).ok_or_else(|| {
        anyhow!(
            "Shift {} has an out-of-range {} of {} seconds",
            shift_id,
            column,
            seconds
        )
    })
}

impl TryFrom<ShiftRow> for Shift {
    type Error = anyhow::Error;

    fn try_from(row: ShiftRow) -> anyhow::Result<Self> {
        let duration = row
            .duration_seconds
            .map(|seconds| stored_span("duration_seconds", row.id, seconds))
            .transpose()?;
        let pause_duration = stored_span("pause_seconds", row.id, row.pause_seconds)?;

        Ok(Self {
            id: Some(row.id),
            employee_id: row.employee_id,
            contract_id: row.contract_id,
            department: row.department,
            started: row.started,
            finished: row.finished,
            bool_finished: row.bool_finished,
            duration,
            pause_started: row.pause_started,
            pause_duration,
            key: ShiftKey::from_code(&row.absence_key),
            note: row.note,
            tags: BTreeSet::new(),
            created_at: row.created_at,
        })
    }
}
