//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `import` - CSV ledger import
//! - `detect` - Recurrence detection
//! - `subscriptions` - Detected subscription management and overrides
//! - `debt` - Debt accounts and payoff simulation
//! - `wants` - Cooling-off tracked purchases
//! - `inventory` - Restock tracking
//! - `report` - The combined analysis report

pub mod debt;
pub mod detect;
pub mod import;
pub mod inventory;
pub mod report;
pub mod subscriptions;
pub mod wants;

// Re-export command functions for main.rs
pub use debt::*;
pub use detect::*;
pub use import::*;
pub use inventory::*;
pub use report::*;
pub use subscriptions::*;
pub use wants::*;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sift_core::{Config, Database};
use tracing::debug;

/// Open the database, creating it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path = db_path.to_str().context("Database path is not valid UTF-8")?;
    debug!(path, "opening database");
    Ok(Database::open(path)?)
}

/// Load config from the given path, or the default location, or defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Ok(Config::load_or_default(Some(p))?),
        None => {
            let default = dirs::config_dir().map(|d| d.join("sift").join("config.toml"));
            Ok(Config::load_or_default(default.as_deref())?)
        }
    }
}

/// Today per the system clock; commands evaluate all date logic against this
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    println!("✅ Database initialized at {}", db.path());
    println!("   Next: sift import --file <transactions.csv>");
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max.saturating_sub(3)])
    }
}

/// Parse a YYYY-MM-DD argument
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").context("Invalid date format (use YYYY-MM-DD)")
}

/// Parse a currency argument like "850" or "850.00"
pub fn parse_amount_arg(s: &str) -> Result<Decimal> {
    s.trim()
        .trim_start_matches('$')
        .parse()
        .with_context(|| format!("Invalid amount: {}", s))
}
