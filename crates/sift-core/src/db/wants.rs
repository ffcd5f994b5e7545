//! Cooling-off record storage

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{date_column, decimal_column, Database};
use crate::error::Result;
use crate::models::{Want, WantStatus};

fn want_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Want> {
    let amount_str: String = row.get(2)?;
    let requested_str: String = row.get(3)?;
    let cooling_off_days: i64 = row.get(4)?;
    let status_str: String = row.get(5)?;
    let decided_str: Option<String> = row.get(6)?;

    Ok(Want {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: decimal_column(2, &amount_str)?,
        requested_date: date_column(3, &requested_str)?,
        cooling_off_days: cooling_off_days as u32,
        status: status_str.parse().unwrap_or(WantStatus::Pending),
        decided_on: match decided_str {
            Some(s) => Some(date_column(6, &s)?),
            None => None,
        },
    })
}

const WANT_COLUMNS: &str =
    "id, description, amount, requested_date, cooling_off_days, status, decided_on";

impl Database {
    /// Log a new want; it starts pending
    pub fn add_want(
        &self,
        description: &str,
        amount: Decimal,
        requested_date: NaiveDate,
        cooling_off_days: u32,
    ) -> Result<i64> {
        self.conn().execute(
            r#"
            INSERT INTO wants (description, amount, requested_date, cooling_off_days)
            VALUES (?, ?, ?, ?)
            "#,
            params![
                description,
                amount.to_string(),
                requested_date.to_string(),
                i64::from(cooling_off_days),
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    /// All wants, oldest request first
    pub fn list_wants(&self) -> Result<Vec<Want>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM wants ORDER BY requested_date, id",
            WANT_COLUMNS
        ))?;

        let wants = stmt
            .query_map([], want_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(wants)
    }

    pub fn get_want(&self, id: i64) -> Result<Option<Want>> {
        let want = self
            .conn()
            .query_row(
                &format!("SELECT {} FROM wants WHERE id = ?", WANT_COLUMNS),
                params![id],
                want_from_row,
            )
            .optional()?;
        Ok(want)
    }

    /// Find a want by numeric ID or exact description (case-insensitive)
    pub fn find_want(&self, id_or_description: &str) -> Result<Option<Want>> {
        if let Ok(id) = id_or_description.parse::<i64>() {
            return self.get_want(id);
        }

        let want = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {} FROM wants WHERE LOWER(description) = LOWER(?) ORDER BY id LIMIT 1",
                    WANT_COLUMNS
                ),
                params![id_or_description],
                want_from_row,
            )
            .optional()?;
        Ok(want)
    }

    /// Persist a want's terminal transition
    pub fn update_want_status(
        &self,
        id: i64,
        status: WantStatus,
        decided_on: Option<NaiveDate>,
    ) -> Result<()> {
        self.conn().execute(
            "UPDATE wants SET status = ?, decided_on = ? WHERE id = ?",
            params![status.as_str(), decided_on.map(|d| d.to_string()), id],
        )?;
        Ok(())
    }
}
