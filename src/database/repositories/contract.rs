use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Contract, NewContract};
use crate::database::types::ContractRow;

const CONTRACT_COLUMNS: &str =
    "id, department, department_short, hours_minutes, contact, created_at, employee_id";

#[derive(Clone)]
pub struct ContractRepository {
    pool: SqlitePool,
}

impl ContractRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_contract(&self, employee_id: i64, input: NewContract) -> Result<Contract> {
        let row = sqlx::query_as::<_, ContractRow>(&format!(
            r#"
            INSERT INTO contracts (department, department_short, hours_minutes, contact, created_at, employee_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(input.department)
        .bind(input.department_short)
        .bind(input.hours.total_minutes())
        .bind(input.contact.unwrap_or_default())
        .bind(Utc::now())
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Contract>> {
        let row = sqlx::query_as::<_, ContractRow>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// All contracts of an employee, ordered by department.
    pub async fn get_all_contracts(&self, employee_id: i64) -> Result<Vec<Contract>> {
        let rows = sqlx::query_as::<_, ContractRow>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE employee_id = ? ORDER BY department, id"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into()).collect())
    }

    /// The contract of the employee's most recently started shift that has
    /// one; otherwise their only contract, if they have exactly one.
    pub async fn get_default_contract(&self, employee_id: i64) -> Result<Option<Contract>> {
        let last_used = sqlx::query_as::<_, ContractRow>(
            r#"
            SELECT c.id, c.department, c.department_short, c.hours_minutes, c.contact,
                   c.created_at, c.employee_id
            FROM shifts s
            INNER JOIN contracts c ON c.id = s.contract_id
            WHERE s.employee_id = ?
            ORDER BY s.started DESC, s.id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = last_used {
            return Ok(Some(row.into()));
        }

        let mut contracts = self.get_all_contracts(employee_id).await?;
        if contracts.len() == 1 {
            return Ok(contracts.pop());
        }

        Ok(None)
    }

    pub async fn update_contract(&self, id: i64, input: NewContract) -> Result<Option<Contract>> {
        let row = sqlx::query_as::<_, ContractRow>(&format!(
            r#"
            UPDATE contracts
            SET department = ?, department_short = ?, hours_minutes = ?, contact = ?
            WHERE id = ?
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(input.department)
        .bind(input.department_short)
        .bind(input.hours.total_minutes())
        .bind(input.contact.unwrap_or_default())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// Deleting a contract also deletes the shifts booked on it.
    pub async fn delete_contract(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
