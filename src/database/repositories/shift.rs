use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::database::models::Shift;
use crate::database::types::{ShiftRow, ShiftTagRow};

const SHIFT_SELECT: &str = r#"
    SELECT s.id, s.employee_id, s.contract_id, c.department, s.started, s.finished,
           s.bool_finished, s.duration_seconds, s.pause_started, s.pause_seconds,
           s.absence_key, s.note, s.created_at
    FROM shifts s
    LEFT JOIN contracts c ON c.id = s.contract_id
"#;

#[derive(Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate, normalize and write a shift. Inserts when the shift has no
    /// id yet and assigns the new id; updates the stored row otherwise.
    pub async fn save(&self, shift: &mut Shift) -> Result<()> {
        shift.clean()?;
        shift.normalize()?;

        let mut tx = self.pool.begin().await?;

        let id = match shift.id {
            Some(id) => {
                Self::update_row(&mut tx, id, shift).await?;
                id
            }
            None => Self::insert_row(&mut tx, shift).await?,
        };
        Self::replace_tags(&mut tx, id, &shift.tags).await?;

        tx.commit().await?;

        shift.id = Some(id);
        log::debug!("Saved {}", shift);
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!("{SHIFT_SELECT} WHERE s.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut shift = Shift::try_from(row)?;
                shift.tags = self.tags_for_shift(id).await?;
                Ok(Some(shift))
            }
            None => Ok(None),
        }
    }

    /// The employee's most recently started shift that is not finished yet.
    pub async fn get_current_shift(&self, employee_id: i64) -> Result<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "{SHIFT_SELECT} WHERE s.employee_id = ? AND s.finished IS NULL ORDER BY s.started DESC, s.id DESC LIMIT 1"
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let id = row.id;
                let mut shift = Shift::try_from(row)?;
                shift.tags = self.tags_for_shift(id).await?;
                Ok(Some(shift))
            }
            None => Ok(None),
        }
    }

    /// All shifts of an employee, most recently finished first.
    pub async fn get_shifts_by_employee(&self, employee_id: i64) -> Result<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(&format!(
            "{SHIFT_SELECT} WHERE s.employee_id = ? ORDER BY s.finished DESC, s.id DESC"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, ShiftTagRow>(
            r#"
            SELECT t.shift_id, t.name
            FROM shift_tags t
            INNER JOIN shifts s ON s.id = t.shift_id
            WHERE s.employee_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<i64, BTreeSet<String>> = HashMap::new();
        for tag in tag_rows {
            tags.entry(tag.shift_id).or_default().insert(tag.name);
        }

        rows.into_iter()
            .map(|row| -> Result<Shift> {
                let id = row.id;
                let mut shift = Shift::try_from(row)?;
                shift.tags = tags.remove(&id).unwrap_or_default();
                Ok(shift)
            })
            .collect()
    }

    async fn tags_for_shift(&self, shift_id: i64) -> Result<BTreeSet<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT name FROM shift_tags WHERE shift_id = ? ORDER BY name")
                .bind(shift_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(names.into_iter().collect())
    }

    async fn insert_row(tx: &mut Transaction<'_, Sqlite>, shift: &Shift) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO shifts (employee_id, contract_id, started, finished, bool_finished,
                                duration_seconds, pause_started, pause_seconds, absence_key,
                                note, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(shift.employee_id)
        .bind(shift.contract_id)
        .bind(shift.started)
        .bind(shift.finished)
        .bind(shift.bool_finished)
        .bind(shift.duration.map(|d| d.num_seconds()))
        .bind(shift.pause_started)
        .bind(shift.pause_duration.num_seconds())
        .bind(shift.key.map(|k| k.code()).unwrap_or(""))
        .bind(&shift.note)
        .bind(shift.created_at)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_row(tx: &mut Transaction<'_, Sqlite>, id: i64, shift: &Shift) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET contract_id = ?, started = ?, finished = ?, bool_finished = ?,
                duration_seconds = ?, pause_started = ?, pause_seconds = ?, absence_key = ?,
                note = ?
            WHERE id = ?
            "#,
        )
        .bind(shift.contract_id)
        .bind(shift.started)
        .bind(shift.finished)
        .bind(shift.bool_finished)
        .bind(shift.duration.map(|d| d.num_seconds()))
        .bind(shift.pause_started)
        .bind(shift.pause_duration.num_seconds())
        .bind(shift.key.map(|k| k.code()).unwrap_or(""))
        .bind(&shift.note)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound.into());
        }

        Ok(())
    }

    async fn replace_tags(
        tx: &mut Transaction<'_, Sqlite>,
        shift_id: i64,
        tags: &BTreeSet<String>,
    ) -> Result<()> {
        sqlx::query("DELETE FROM shift_tags WHERE shift_id = ?")
            .bind(shift_id)
            .execute(&mut **tx)
            .await?;

        for tag in tags {
            sqlx::query("INSERT INTO shift_tags (shift_id, name) VALUES (?, ?)")
                .bind(shift_id)
                .bind(tag)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
