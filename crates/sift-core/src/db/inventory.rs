//! Recurring purchase item storage

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{date_column, Database};
use crate::error::Result;
use crate::models::RecurringPurchaseItem;

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecurringPurchaseItem> {
    let last_purchase_str: String = row.get(4)?;
    let history_json: String = row.get(5)?;

    let purchase_history: Vec<NaiveDate> = serde_json::from_str(&history_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(RecurringPurchaseItem {
        name: row.get(0)?,
        merchant: row.get(1)?,
        typical_interval_days: row.get(2)?,
        interval_stddev: row.get(3)?,
        last_purchase_date: date_column(4, &last_purchase_str)?,
        purchase_history,
    })
}

const ITEM_COLUMNS: &str =
    "name, merchant, typical_interval_days, interval_stddev, last_purchase_date, purchase_history";

impl Database {
    /// Insert or update an item by name
    pub fn upsert_inventory_item(&self, item: &RecurringPurchaseItem) -> Result<()> {
        let history_json = serde_json::to_string(&item.purchase_history)?;

        self.conn().execute(
            r#"
            INSERT INTO inventory_items
                (name, merchant, typical_interval_days, interval_stddev,
                 last_purchase_date, purchase_history)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                merchant = excluded.merchant,
                typical_interval_days = excluded.typical_interval_days,
                interval_stddev = excluded.interval_stddev,
                last_purchase_date = excluded.last_purchase_date,
                purchase_history = excluded.purchase_history
            "#,
            params![
                item.name,
                item.merchant,
                item.typical_interval_days,
                item.interval_stddev,
                item.last_purchase_date.to_string(),
                history_json,
            ],
        )?;
        Ok(())
    }

    /// All tracked items, by name
    pub fn list_inventory_items(&self) -> Result<Vec<RecurringPurchaseItem>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM inventory_items ORDER BY name",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map([], item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn get_inventory_item(&self, name: &str) -> Result<Option<RecurringPurchaseItem>> {
        let item = self
            .conn()
            .query_row(
                &format!(
                    "SELECT {} FROM inventory_items WHERE LOWER(name) = LOWER(?)",
                    ITEM_COLUMNS
                ),
                params![name],
                item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Remove an item; returns false if it didn't exist
    pub fn remove_inventory_item(&self, name: &str) -> Result<bool> {
        let changed = self.conn().execute(
            "DELETE FROM inventory_items WHERE LOWER(name) = LOWER(?)",
            params![name],
        )?;
        Ok(changed > 0)
    }
}
