//! Detection results and merchant overrides

use rusqlite::params;

use super::{date_column, decimal_column, Database};
use crate::detect::MerchantOverrides;
use crate::error::Result;
use crate::models::{Confidence, MerchantOverride, Subscription, SubscriptionStatus};

impl Database {
    /// Replace the stored detection results with a fresh run's output
    ///
    /// Detection is a pure function of the ledger and overrides, so the
    /// stored rows are a cache of the latest run, not accumulated state.
    pub fn replace_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()> {
        self.conn().execute("DELETE FROM subscriptions", [])?;

        for sub in subscriptions {
            self.conn().execute(
                r#"
                INSERT INTO subscriptions
                    (merchant, average_interval_days, interval_stddev, average_amount,
                     occurrences, confidence, first_seen, last_seen, status)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    sub.merchant,
                    sub.average_interval_days,
                    sub.interval_stddev,
                    sub.average_amount.to_string(),
                    sub.occurrences as i64,
                    sub.confidence.as_str(),
                    sub.first_seen.to_string(),
                    sub.last_seen.to_string(),
                    sub.status.as_str(),
                ],
            )?;
        }

        Ok(())
    }

    /// Stored subscriptions in detection order
    pub fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn().prepare(
            r#"
            SELECT merchant, average_interval_days, interval_stddev, average_amount,
                   occurrences, confidence, first_seen, last_seen, status
            FROM subscriptions
            ORDER BY id
            "#,
        )?;

        let subscriptions = stmt
            .query_map([], |row| {
                let amount_str: String = row.get(3)?;
                let occurrences: i64 = row.get(4)?;
                let confidence_str: String = row.get(5)?;
                let first_seen_str: String = row.get(6)?;
                let last_seen_str: String = row.get(7)?;
                let status_str: String = row.get(8)?;

                Ok(Subscription {
                    merchant: row.get(0)?,
                    average_interval_days: row.get(1)?,
                    interval_stddev: row.get(2)?,
                    average_amount: decimal_column(3, &amount_str)?,
                    occurrences: occurrences as usize,
                    confidence: confidence_str.parse().unwrap_or(Confidence::Low),
                    first_seen: date_column(6, &first_seen_str)?,
                    last_seen: date_column(7, &last_seen_str)?,
                    status: status_str.parse().unwrap_or(SubscriptionStatus::Active),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(subscriptions)
    }

    // ========== Merchant Overrides ==========

    /// Record a user override for a merchant identity
    ///
    /// A dismissal suppresses the merchant in every later detection run; a
    /// confirmation trusts the merchant regardless of amount variance.
    pub fn set_merchant_override(&self, merchant: &str, kind: MerchantOverride) -> Result<()> {
        self.conn().execute(
            r#"
            INSERT INTO merchant_overrides (merchant, kind)
            VALUES (?, ?)
            ON CONFLICT(merchant) DO UPDATE SET kind = excluded.kind
            "#,
            params![merchant.to_uppercase(), kind.as_str()],
        )?;
        Ok(())
    }

    /// Remove a user override; returns false if none existed
    pub fn clear_merchant_override(&self, merchant: &str) -> Result<bool> {
        let changed = self.conn().execute(
            "DELETE FROM merchant_overrides WHERE merchant = ?",
            params![merchant.to_uppercase()],
        )?;
        Ok(changed > 0)
    }

    /// All overrides, shaped for the detector
    pub fn merchant_overrides(&self) -> Result<MerchantOverrides> {
        let mut stmt = self
            .conn()
            .prepare("SELECT merchant, kind FROM merchant_overrides")?;

        let mut overrides = MerchantOverrides::default();
        let rows = stmt.query_map([], |row| {
            let merchant: String = row.get(0)?;
            let kind: String = row.get(1)?;
            Ok((merchant, kind))
        })?;

        for row in rows {
            let (merchant, kind) = row?;
            match kind.parse() {
                Ok(MerchantOverride::Dismissed) => {
                    overrides.dismissed.insert(merchant);
                }
                Ok(MerchantOverride::Confirmed) => {
                    overrides.confirmed.insert(merchant);
                }
                Err(_) => {}
            }
        }

        Ok(overrides)
    }

    /// Overrides with their kind, for display
    pub fn list_merchant_overrides(&self) -> Result<Vec<(String, MerchantOverride)>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT merchant, kind FROM merchant_overrides ORDER BY merchant")?;

        let rows = stmt
            .query_map([], |row| {
                let merchant: String = row.get(0)?;
                let kind: String = row.get(1)?;
                Ok((merchant, kind))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|(m, k)| k.parse().ok().map(|kind| (m, kind)))
            .collect())
    }
}
