//! Ledger storage

use rusqlite::params;

use super::{date_column, decimal_column, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction};

/// Counts from inserting an import batch
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertOutcome {
    pub inserted: usize,
    /// Rows already present from an earlier import (matched on import_hash)
    pub duplicates: usize,
}

impl Database {
    /// Insert imported transactions, skipping duplicates by import_hash
    pub fn insert_transactions(&self, batch: &[NewTransaction]) -> Result<InsertOutcome> {
        let mut outcome = InsertOutcome::default();

        for tx in batch {
            let changed = self.conn().execute(
                r#"
                INSERT OR IGNORE INTO transactions (account_id, date, merchant, amount, category, import_hash)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    tx.account_id,
                    tx.date.to_string(),
                    tx.merchant,
                    tx.amount.to_string(),
                    tx.category,
                    tx.import_hash,
                ],
            )?;
            if changed == 1 {
                outcome.inserted += 1;
            } else {
                outcome.duplicates += 1;
            }
        }

        Ok(outcome)
    }

    /// All transactions, date ascending
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT id, account_id, date, merchant, amount, category, import_hash, created_at
            FROM transactions
            ORDER BY date, id
            "#,
        )?;

        let transactions = stmt
            .query_map([], |row| {
                let date_str: String = row.get(2)?;
                let amount_str: String = row.get(4)?;
                let created_at_str: String = row.get(7)?;

                Ok(Transaction {
                    id: row.get(0)?,
                    account_id: row.get(1)?,
                    date: date_column(2, &date_str)?,
                    merchant: row.get(3)?,
                    amount: decimal_column(4, &amount_str)?,
                    category: row.get(5)?,
                    import_hash: row.get(6)?,
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    pub fn count_transactions(&self) -> Result<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}
