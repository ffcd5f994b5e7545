//! SQLite persistence layer
//!
//! This module is organized by domain:
//! - `transactions` - Ledger storage with import dedup
//! - `subscriptions` - Detection results and merchant overrides
//! - `wants` - Cooling-off records
//! - `debts` - Debt account snapshots
//! - `inventory` - Recurring purchase items
//!
//! The engine modules never touch the database; commands load plain records
//! here and hand them to the pure analysis functions.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::Result;

mod debts;
mod inventory;
mod subscriptions;
mod transactions;
mod wants;

#[cfg(test)]
mod tests;

pub use transactions::InsertOutcome;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored date column, surfacing corruption as a conversion error
pub(crate) fn date_column(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a stored decimal amount column
///
/// Amounts live in TEXT columns so they round-trip exactly; REAL would
/// reintroduce the float drift the decimal representation exists to avoid.
pub(crate) fn decimal_column(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    s.parse::<Decimal>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper
pub struct Database {
    conn: Connection,
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            db_path: ":memory:".to_string(),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Clear all stored data, preserving the schema
    pub fn reset(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            DELETE FROM subscriptions;
            DELETE FROM merchant_overrides;
            DELETE FROM wants;
            DELETE FROM debt_accounts;
            DELETE FROM inventory_items;
            DELETE FROM transactions;
            "#,
        )?;
        info!("database reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- The transaction ledger. Amounts are decimal strings in TEXT
            -- columns for exact round-trips.
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                account_id TEXT NOT NULL,
                date DATE NOT NULL,
                merchant TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT,
                import_hash TEXT UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);

            -- Detected recurring charges, replaced wholesale each run
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY,
                merchant TEXT NOT NULL UNIQUE,
                average_interval_days REAL NOT NULL,
                interval_stddev REAL NOT NULL,
                average_amount TEXT NOT NULL,
                occurrences INTEGER NOT NULL,
                confidence TEXT NOT NULL,
                first_seen DATE NOT NULL,
                last_seen DATE NOT NULL,
                status TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- User overrides survive re-detection
            CREATE TABLE IF NOT EXISTS merchant_overrides (
                merchant TEXT PRIMARY KEY,
                kind TEXT NOT NULL,              -- dismissed | confirmed
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Discretionary purchase candidates
            CREATE TABLE IF NOT EXISTS wants (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,
                requested_date DATE NOT NULL,
                cooling_off_days INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                decided_on DATE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_wants_status ON wants(status);

            -- Debt account snapshots fed into the simulator
            CREATE TABLE IF NOT EXISTS debt_accounts (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                balance TEXT NOT NULL,
                apr TEXT NOT NULL,
                minimum_payment TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Recurring physical purchases with their purchase history
            -- (JSON array of dates)
            CREATE TABLE IF NOT EXISTS inventory_items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                merchant TEXT NOT NULL,
                typical_interval_days REAL NOT NULL,
                interval_stddev REAL NOT NULL DEFAULT 0,
                last_purchase_date DATE NOT NULL,
                purchase_history TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        Ok(())
    }
}
