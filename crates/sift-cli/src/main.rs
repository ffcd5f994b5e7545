//! sift CLI - Personal finance decision engine
//!
//! Usage:
//!   sift init                     Initialize database
//!   sift import --file CSV        Import transactions
//!   sift detect                   Find recurring charges
//!   sift debt simulate --budget N Project a payoff plan
//!   sift wants add "thing" --amount N   Start a cooling-off clock
//!   sift report                   Everything at once

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file, as_of } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file, as_of.as_deref())
        }
        Commands::Detect => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_detect(&db, &config, commands::today())
        }
        Commands::Subscriptions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(SubscriptionsAction::List) => commands::cmd_subscriptions_list(&db),
                Some(SubscriptionsAction::Dismiss { merchant }) => {
                    commands::cmd_subscriptions_dismiss(&db, &config, &merchant, commands::today())
                }
                Some(SubscriptionsAction::Confirm { merchant }) => {
                    commands::cmd_subscriptions_confirm(&db, &config, &merchant, commands::today())
                }
                Some(SubscriptionsAction::Reset { merchant }) => {
                    commands::cmd_subscriptions_reset(&db, &config, &merchant, commands::today())
                }
                Some(SubscriptionsAction::Overrides) => commands::cmd_subscriptions_overrides(&db),
            }
        }
        Commands::Debt { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                DebtAction::List => commands::cmd_debt_list(&db),
                DebtAction::Add {
                    name,
                    balance,
                    apr,
                    minimum,
                } => commands::cmd_debt_add(&db, &name, &balance, &apr, &minimum),
                DebtAction::Remove { name } => commands::cmd_debt_remove(&db, &name),
                DebtAction::Simulate {
                    budget,
                    strategy,
                    compare,
                    schedule,
                } => commands::cmd_debt_simulate(
                    &db,
                    &config,
                    budget.as_deref(),
                    strategy.as_deref(),
                    compare,
                    schedule,
                ),
            }
        }
        Commands::Wants { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(WantsAction::List) => {
                    commands::cmd_wants_list(&db, &config, commands::today())
                }
                Some(WantsAction::Add {
                    description,
                    amount,
                    days,
                }) => commands::cmd_wants_add(
                    &db,
                    &config,
                    &description,
                    &amount,
                    days,
                    commands::today(),
                ),
                Some(WantsAction::Confirm { want }) => {
                    commands::cmd_wants_confirm(&db, &config, &want, commands::today())
                }
                Some(WantsAction::Reject { want }) => {
                    commands::cmd_wants_reject(&db, &config, &want, commands::today())
                }
            }
        }
        Commands::Inventory { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(InventoryAction::List) => {
                    commands::cmd_inventory_list(&db, commands::today())
                }
                Some(InventoryAction::Add {
                    name,
                    merchant,
                    interval,
                    last_purchase,
                }) => commands::cmd_inventory_add(
                    &db,
                    &name,
                    &merchant,
                    interval,
                    last_purchase.as_deref(),
                ),
                Some(InventoryAction::Record { name, date }) => {
                    commands::cmd_inventory_record(&db, &name, date.as_deref())
                }
                Some(InventoryAction::Sync) => commands::cmd_inventory_sync(&db, commands::today()),
                Some(InventoryAction::Expiring { horizon }) => {
                    commands::cmd_inventory_expiring(&db, &config, horizon, commands::today())
                }
                Some(InventoryAction::Remove { name }) => commands::cmd_inventory_remove(&db, &name),
            }
        }
        Commands::Report => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_report(&db, &config, commands::today())
        }
    }
}
