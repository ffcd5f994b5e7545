//! Sift Core Library
//!
//! Shared functionality for the sift personal finance tool:
//! - Transaction ledger with validation
//! - Recurring-charge detection from transaction patterns
//! - Debt payoff simulation (avalanche and snowball strategies)
//! - Cooling-off tracking for discretionary purchases
//! - Restock/expiration tracking for recurring physical purchases
//! - SQLite persistence and CSV import

pub mod config;
pub mod db;
pub mod debt;
pub mod detect;
pub mod error;
pub mod import;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod money;
pub mod stats;
pub mod wants;

pub use config::{Config, DebtConfig, DetectorConfig, InventoryConfig, WantsConfig};
pub use db::Database;
pub use detect::MerchantOverrides;
pub use error::{Error, Result};
pub use import::ImportResult;
pub use ledger::{Ledger, LedgerStats};
pub use models::{
    AccountMonth, Confidence, DebtAccount, MerchantOverride, MonthSnapshot, NewTransaction,
    PayoffPlan, RecurringPurchaseItem, Strategy, Subscription, SubscriptionStatus, Transaction,
    Want, WantStatus,
};
