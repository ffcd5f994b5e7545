//! Error types for sift

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{PayoffPlan, WantStatus};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("Monthly budget ${budget} cannot cover ${required} in minimum payments")]
    InsufficientBudget { required: Decimal, budget: Decimal },

    #[error("Cooling-off period has not elapsed; eligible on {eligible_on}")]
    TooEarly { eligible_on: NaiveDate },

    #[error("Payoff plan did not converge within {months} months")]
    NonConvergent { months: u32, plan: Box<PayoffPlan> },

    #[error("Want's grace period ended on {expired_on}; it can no longer be confirmed")]
    WantExpired { expired_on: NaiveDate },

    #[error("Want was already {status}")]
    WantAlreadyDecided { status: WantStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
