//! Debt command implementations

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use sift_core::{debt, money, Config, Database, DebtAccount, Error, PayoffPlan, Strategy};

use super::parse_amount_arg;

pub fn cmd_debt_list(db: &Database) -> Result<()> {
    let accounts = db.list_debt_accounts()?;

    if accounts.is_empty() {
        println!("No debt accounts stored. Add one:");
        println!("  sift debt add \"Visa\" --balance 1000 --apr 20 --minimum 25");
        return Ok(());
    }

    println!();
    println!("💳 Debt Accounts");
    println!("   ─────────────────────────────────────────────────────────────");

    let mut total = Decimal::ZERO;
    let mut monthly_interest = Decimal::ZERO;
    for acc in &accounts {
        println!(
            "   {:20} │ {:>12} │ {:>6}% APR │ min {:>9}",
            acc.name,
            money::format_usd(acc.balance),
            acc.apr,
            money::format_usd(acc.minimum_payment)
        );
        total += acc.balance;
        monthly_interest += acc.monthly_interest();
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Total: {} │ costing ~{}/mo in interest",
        money::format_usd(total),
        money::format_usd(monthly_interest)
    );

    Ok(())
}

pub fn cmd_debt_add(
    db: &Database,
    name: &str,
    balance: &str,
    apr: &str,
    minimum: &str,
) -> Result<()> {
    let account = DebtAccount {
        name: name.to_string(),
        balance: parse_amount_arg(balance)?,
        apr: parse_amount_arg(apr)?,
        minimum_payment: parse_amount_arg(minimum)?,
    };
    if account.balance < Decimal::ZERO || account.apr < Decimal::ZERO {
        bail!("Balance and APR must be non-negative");
    }

    db.upsert_debt_account(&account)?;
    println!(
        "✅ {} saved: {} at {}% APR, min {}",
        account.name,
        money::format_usd(account.balance),
        account.apr,
        money::format_usd(account.minimum_payment)
    );
    Ok(())
}

pub fn cmd_debt_remove(db: &Database, name: &str) -> Result<()> {
    if db.remove_debt_account(name)? {
        println!("✅ Removed {}", name);
    } else {
        println!("❌ No debt account named {}", name);
    }
    Ok(())
}

pub fn cmd_debt_simulate(
    db: &Database,
    config: &Config,
    budget: Option<&str>,
    strategy: Option<&str>,
    compare: bool,
    schedule: bool,
) -> Result<()> {
    let accounts = db.list_debt_accounts()?;
    if accounts.is_empty() {
        println!("No debt accounts stored; nothing to simulate.");
        return Ok(());
    }

    let budget = match budget {
        Some(s) => parse_amount_arg(s)?,
        None => match config.debt.monthly_budget {
            Some(b) => b,
            None => bail!("No budget given; pass --budget or set debt.monthly_budget in config"),
        },
    };

    if compare {
        let avalanche = run(&accounts, budget, Strategy::Avalanche, schedule)?;
        println!();
        let snowball = run(&accounts, budget, Strategy::Snowball, schedule)?;

        if let (Some(a), Some(s)) = (avalanche, snowball) {
            let saved = s.total_interest() - a.total_interest();
            println!();
            println!(
                "   Avalanche saves {} in interest over snowball",
                money::format_usd(saved)
            );
        }
        return Ok(());
    }

    let strategy = match strategy {
        Some(s) => s.parse::<Strategy>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.debt.strategy,
    };
    run(&accounts, budget, strategy, schedule)?;
    Ok(())
}

/// Run one simulation and print it; returns the plan when it converged
fn run(
    accounts: &[DebtAccount],
    budget: Decimal,
    strategy: Strategy,
    schedule: bool,
) -> Result<Option<PayoffPlan>> {
    match debt::simulate(accounts, budget, strategy) {
        Ok(plan) => {
            print_plan(&plan, schedule);
            Ok(Some(plan))
        }
        Err(Error::InsufficientBudget { required, budget }) => {
            println!(
                "❌ Budget {} cannot cover the {} in minimum payments.",
                money::format_usd(budget),
                money::format_usd(required)
            );
            println!("   Raise the budget by at least {}.", money::format_usd(required - budget));
            Ok(None)
        }
        Err(Error::NonConvergent { months, plan }) => {
            println!(
                "❌ {} plan does not pay off within {} months ({} years).",
                plan.strategy, months, months / 12
            );
            let last = plan.months.last().expect("non-convergent plan has months");
            let remaining: Decimal = last.accounts.values().map(|a| a.balance).sum();
            println!(
                "   Balances grew to {}; interest outruns the budget. Raise the budget.",
                money::format_usd(remaining)
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_plan(plan: &PayoffPlan, schedule: bool) {
    println!();
    println!(
        "📉 {} plan · budget {}/mo",
        capitalized(plan.strategy.as_str()),
        money::format_usd(plan.monthly_budget)
    );
    println!(
        "   Debt-free in {} months ({:.1} years)",
        plan.months_to_debt_free(),
        plan.months_to_debt_free() as f64 / 12.0
    );
    println!(
        "   Total paid {} · total interest {}",
        money::format_usd(plan.total_paid()),
        money::format_usd(plan.total_interest())
    );

    // Payoff order
    let mut order: Vec<(u32, String)> = Vec::new();
    for month in &plan.months {
        for (name, acc) in &month.accounts {
            if acc.balance == Decimal::ZERO && !order.iter().any(|(_, n)| n == name) {
                order.push((month.month, name.clone()));
            }
        }
    }
    for (month, name) in &order {
        println!("   month {:>3}: {} paid off", month, name);
    }

    if schedule {
        println!();
        println!("   month │ account              │   payment │  interest │   balance");
        println!("   ──────┼──────────────────────┼───────────┼───────────┼──────────");
        for month in &plan.months {
            for (name, acc) in &month.accounts {
                println!(
                    "   {:>5} │ {:20} │ {:>9} │ {:>9} │ {:>9}",
                    month.month,
                    super::truncate(name, 20),
                    money::format_usd(acc.payment),
                    money::format_usd(acc.interest),
                    money::format_usd(acc.balance)
                );
            }
        }
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
