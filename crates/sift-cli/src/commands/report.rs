//! The combined analysis report
//!
//! Pulls the four engine outputs together: subscriptions, the payoff plan,
//! wants, and restock alerts. Pure formatting over engine structures.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sift_core::{
    debt, detect, inventory, money, wants, Config, Database, Error, Ledger, SubscriptionStatus,
    WantStatus,
};

use super::truncate;

pub fn cmd_report(db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  sift report · {}", today);
    println!("══════════════════════════════════════════════════════════════");

    report_subscriptions(db, config, today)?;
    report_debt(db, config)?;
    report_wants(db, config, today)?;
    report_inventory(db, config, today)?;

    println!();
    Ok(())
}

fn report_subscriptions(db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    let transactions = db.list_transactions()?;
    if transactions.is_empty() {
        println!();
        println!("  Ledger is empty. Import transactions to see subscriptions.");
        return Ok(());
    }

    let (ledger, _) = Ledger::new(transactions, today);
    let overrides = db.merchant_overrides()?;
    let subscriptions = detect::detect(&ledger, &config.detector, &overrides, today);
    db.replace_subscriptions(&subscriptions)?;

    println!();
    println!("  📋 Recurring charges ({})", subscriptions.len());

    let mut monthly_total = Decimal::ZERO;
    for sub in &subscriptions {
        let icon = match sub.status {
            SubscriptionStatus::Active => "✅",
            SubscriptionStatus::Lapsed => "💤",
        };
        println!(
            "     {} {:28} {:>10}/mo  ({})",
            icon,
            truncate(&sub.merchant, 28),
            money::format_usd(sub.monthly_cost()),
            sub.confidence
        );
        if sub.status == SubscriptionStatus::Active {
            monthly_total += sub.monthly_cost();
        }
    }
    if !subscriptions.is_empty() {
        println!(
            "     Active: {}/mo · {}/yr",
            money::format_usd(monthly_total),
            money::format_usd(monthly_total * Decimal::from(12))
        );
    }

    Ok(())
}

fn report_debt(db: &Database, config: &Config) -> Result<()> {
    let accounts = db.list_debt_accounts()?;
    if accounts.is_empty() {
        return Ok(());
    }

    let total: Decimal = accounts.iter().map(|a| a.balance).sum();
    println!();
    println!(
        "  💳 Debt: {} across {} accounts",
        money::format_usd(total),
        accounts.len()
    );

    let Some(budget) = config.debt.monthly_budget else {
        println!("     Set debt.monthly_budget in config for a payoff projection.");
        return Ok(());
    };

    match debt::simulate(&accounts, budget, config.debt.strategy) {
        Ok(plan) => {
            println!(
                "     {} @ {}/mo: debt-free in {} months, {} interest",
                plan.strategy,
                money::format_usd(budget),
                plan.months_to_debt_free(),
                money::format_usd(plan.total_interest())
            );
        }
        Err(Error::InsufficientBudget { required, .. }) => {
            println!(
                "     ❌ Budget {} is below the {} minimums. Add funds.",
                money::format_usd(budget),
                money::format_usd(required)
            );
        }
        Err(Error::NonConvergent { months, .. }) => {
            println!(
                "     ❌ No payoff within {} months at this budget. Add funds.",
                months
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn report_wants(db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    let all = db.list_wants()?;
    if all.is_empty() {
        return Ok(());
    }

    let expired = wants::sweep_expired(&all, today, config.wants.grace_period_days);
    for want in &expired {
        db.update_want_status(want.id, want.status, want.decided_on)?;
    }
    let all = db.list_wants()?;

    let ready: Vec<_> = all
        .iter()
        .filter(|w| w.is_actionable(today, config.wants.grace_period_days))
        .collect();
    let cooling = all
        .iter()
        .filter(|w| w.status == WantStatus::Pending)
        .count()
        - ready.len();

    println!();
    println!(
        "  🛒 Wants: {} ready to confirm, {} still cooling off",
        ready.len(),
        cooling
    );
    for want in ready {
        println!(
            "     🟢 #{} {} ({})",
            want.id,
            truncate(&want.description, 30),
            money::format_usd(want.amount)
        );
    }

    Ok(())
}

fn report_inventory(db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    let items = db.list_inventory_items()?;
    if items.is_empty() {
        return Ok(());
    }

    let horizon = config.inventory.expiration_horizon_days;
    let expiring = inventory::query_expiring(&items, horizon, today);

    println!();
    println!(
        "  📦 Restock: {} of {} items within {} days",
        expiring.len(),
        items.len(),
        horizon
    );
    for item in &expiring {
        let days = item.days_until_depletion(today);
        let note = if days <= 0 {
            "overdue".to_string()
        } else {
            format!("{} days", days)
        };
        println!("     🚨 {:24} {}", truncate(&item.name, 24), note);
    }

    Ok(())
}
