//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sift - Decide what your money is actually doing
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Personal finance decision engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "sift.db", global = true)]
    pub db: PathBuf,

    /// Config file path (defaults to ~/.config/sift/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from a CSV export
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Treat this date as the sync time instead of today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Detect recurring charges in the ledger
    Detect,

    /// Manage detected subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: Option<SubscriptionsAction>,
    },

    /// Manage debt accounts and payoff simulations
    Debt {
        #[command(subcommand)]
        action: DebtAction,
    },

    /// Manage wants (cooling-off tracked purchases)
    Wants {
        #[command(subcommand)]
        action: Option<WantsAction>,
    },

    /// Track recurring physical purchases and restock dates
    Inventory {
        #[command(subcommand)]
        action: Option<InventoryAction>,
    },

    /// Full analysis report
    Report,
}

#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// List detected subscriptions (default)
    List,

    /// Never flag this merchant as a subscription again
    Dismiss {
        /// Merchant identity as shown by `sift subscriptions`
        merchant: String,
    },

    /// Always flag this merchant when its cadence qualifies, even with
    /// variable amounts
    Confirm {
        merchant: String,
    },

    /// Remove a dismiss/confirm override
    Reset {
        merchant: String,
    },

    /// List stored overrides
    Overrides,
}

#[derive(Subcommand)]
pub enum DebtAction {
    /// List debt accounts
    List,

    /// Add or update a debt account snapshot
    Add {
        /// Account name
        name: String,

        /// Current balance owed
        #[arg(long)]
        balance: String,

        /// Annual percentage rate (21.5 = 21.5%)
        #[arg(long)]
        apr: String,

        /// Minimum monthly payment
        #[arg(long)]
        minimum: String,
    },

    /// Remove a debt account
    Remove { name: String },

    /// Simulate a payoff plan
    Simulate {
        /// Monthly payoff budget (falls back to config)
        #[arg(long)]
        budget: Option<String>,

        /// avalanche or snowball (falls back to config)
        #[arg(long)]
        strategy: Option<String>,

        /// Run both strategies and compare
        #[arg(long)]
        compare: bool,

        /// Print the month-by-month schedule
        #[arg(long)]
        schedule: bool,
    },
}

#[derive(Subcommand)]
pub enum WantsAction {
    /// List wants and their cooling-off status (default)
    List,

    /// Log a new want; the cooling-off clock starts today
    Add {
        /// What you want to buy
        description: String,

        /// Price
        #[arg(long)]
        amount: String,

        /// Override the configured cooling-off period
        #[arg(long)]
        days: Option<u32>,
    },

    /// Approve a want whose cooling-off period has elapsed
    Confirm {
        /// Want ID or description
        want: String,
    },

    /// Cancel a want (allowed any time)
    Reject {
        /// Want ID or description
        want: String,
    },
}

#[derive(Subcommand)]
pub enum InventoryAction {
    /// List tracked items (default)
    List,

    /// Track a new recurring purchase
    Add {
        /// Item name
        name: String,

        /// Merchant it's bought from (raw descriptor is fine)
        #[arg(long)]
        merchant: String,

        /// Initial estimate of days between purchases
        #[arg(long)]
        interval: f64,

        /// Date of the most recent purchase (defaults to today)
        #[arg(long)]
        last_purchase: Option<String>,
    },

    /// Record a purchase of a tracked item
    Record {
        /// Item name
        name: String,

        /// Purchase date (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Fold matching ledger transactions into every tracked item
    Sync,

    /// Items running out soon
    Expiring {
        /// Horizon in days (falls back to config)
        #[arg(long)]
        horizon: Option<u32>,
    },

    /// Stop tracking an item
    Remove { name: String },
}
