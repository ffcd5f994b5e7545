//! Debt account snapshot storage
//!
//! Stored balances are snapshots of the real accounts, refreshed by the
//! user. The simulator reads them and never writes back.

use rusqlite::params;

use super::{decimal_column, Database};
use crate::error::Result;
use crate::models::DebtAccount;

impl Database {
    /// Insert or update a debt account by name
    pub fn upsert_debt_account(&self, account: &DebtAccount) -> Result<()> {
        self.conn().execute(
            r#"
            INSERT INTO debt_accounts (name, balance, apr, minimum_payment)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                balance = excluded.balance,
                apr = excluded.apr,
                minimum_payment = excluded.minimum_payment
            "#,
            params![
                account.name,
                account.balance.to_string(),
                account.apr.to_string(),
                account.minimum_payment.to_string(),
            ],
        )?;
        Ok(())
    }

    /// All debt accounts, by name
    pub fn list_debt_accounts(&self) -> Result<Vec<DebtAccount>> {
        let mut stmt = self.conn().prepare(
            "SELECT name, balance, apr, minimum_payment FROM debt_accounts ORDER BY name",
        )?;

        let accounts = stmt
            .query_map([], |row| {
                let balance_str: String = row.get(1)?;
                let apr_str: String = row.get(2)?;
                let minimum_str: String = row.get(3)?;

                Ok(DebtAccount {
                    name: row.get(0)?,
                    balance: decimal_column(1, &balance_str)?,
                    apr: decimal_column(2, &apr_str)?,
                    minimum_payment: decimal_column(3, &minimum_str)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Remove a debt account; returns false if it didn't exist
    pub fn remove_debt_account(&self, name: &str) -> Result<bool> {
        let changed = self
            .conn()
            .execute("DELETE FROM debt_accounts WHERE name = ?", params![name])?;
        Ok(changed > 0)
    }
}
