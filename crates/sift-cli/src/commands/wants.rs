//! Wants command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sift_core::{money, wants, Config, Database, Error, Want, WantStatus};

use super::{parse_amount_arg, truncate};

/// Expire stale pending wants before any want command runs
///
/// Expiry is evaluated on demand; nothing polls. Returns the number of
/// wants that transitioned.
fn sweep(db: &Database, config: &Config, today: NaiveDate) -> Result<usize> {
    let all = db.list_wants()?;
    let expired = wants::sweep_expired(&all, today, config.wants.grace_period_days);
    for want in &expired {
        db.update_want_status(want.id, want.status, want.decided_on)?;
    }
    Ok(expired.len())
}

pub fn cmd_wants_list(db: &Database, config: &Config, today: NaiveDate) -> Result<()> {
    let swept = sweep(db, config, today)?;
    if swept > 0 {
        println!("💨 {} stale wants expired without action", swept);
    }

    let all = db.list_wants()?;
    if all.is_empty() {
        println!("No wants logged. Start a cooling-off clock:");
        println!("  sift wants add \"thing\" --amount 100");
        return Ok(());
    }

    println!();
    println!("🛒 Wants");
    println!("   ─────────────────────────────────────────────────────────────");

    for want in &all {
        let (icon, note) = match want.status {
            WantStatus::Pending if want.is_actionable(today, config.wants.grace_period_days) => {
                ("🟢", "ready to confirm".to_string())
            }
            WantStatus::Pending => (
                "⏳",
                format!("eligible in {} days", want.days_until_eligible(today)),
            ),
            WantStatus::Approved => ("✅", format!("approved {}", decided(want))),
            WantStatus::Rejected => ("❌", format!("rejected {}", decided(want))),
            WantStatus::Expired => ("💨", format!("expired {}", decided(want))),
        };

        println!(
            "   {} #{:<3} {:30} {:>10}  {}",
            icon,
            want.id,
            truncate(&want.description, 30),
            money::format_usd(want.amount),
            note
        );
    }

    // Cooling-off effectiveness
    let spent: Decimal = by_status(&all, WantStatus::Approved);
    let saved: Decimal = by_status(&all, WantStatus::Rejected)
        + by_status(&all, WantStatus::Expired);
    let pending: Decimal = by_status(&all, WantStatus::Pending);

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Approved {} · walked away from {} · pending {}",
        money::format_usd(spent),
        money::format_usd(saved),
        money::format_usd(pending)
    );

    Ok(())
}

fn by_status(all: &[Want], status: WantStatus) -> Decimal {
    all.iter()
        .filter(|w| w.status == status)
        .map(|w| w.amount)
        .sum()
}

fn decided(want: &Want) -> String {
    want.decided_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "?".to_string())
}

pub fn cmd_wants_add(
    db: &Database,
    config: &Config,
    description: &str,
    amount: &str,
    days: Option<u32>,
    today: NaiveDate,
) -> Result<()> {
    let amount = parse_amount_arg(amount)?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive");
    }
    let cooling_off_days = days.unwrap_or(config.wants.cooling_off_days);

    let id = db.add_want(description, amount, today, cooling_off_days)?;
    let want = db.get_want(id)?.expect("want was just inserted");

    println!(
        "✅ Logged want #{}: {} ({})",
        id,
        description,
        money::format_usd(amount)
    );
    println!(
        "   Cooling off for {} days; confirmable from {}",
        cooling_off_days,
        want.eligible_on()
    );
    Ok(())
}

pub fn cmd_wants_confirm(
    db: &Database,
    config: &Config,
    id_or_description: &str,
    today: NaiveDate,
) -> Result<()> {
    sweep(db, config, today)?;

    let want = db
        .find_want(id_or_description)?
        .ok_or_else(|| anyhow::anyhow!("Want not found: {}", id_or_description))?;

    match wants::confirm(&want, today, config.wants.grace_period_days) {
        Ok(approved) => {
            db.update_want_status(approved.id, approved.status, approved.decided_on)?;
            println!(
                "✅ Approved: {} ({}). Enjoy it.",
                approved.description,
                money::format_usd(approved.amount)
            );
        }
        Err(Error::TooEarly { eligible_on }) => {
            println!(
                "⏳ Not yet. {} is confirmable from {} ({} more days).",
                want.description,
                eligible_on,
                (eligible_on - today).num_days()
            );
            println!("   Still want it then? That's the point of waiting.");
        }
        Err(Error::WantExpired { expired_on }) => {
            println!(
                "💨 Too late. {}'s grace period ended on {}; log it again if you still want it.",
                want.description, expired_on
            );
        }
        Err(Error::WantAlreadyDecided { status }) => {
            println!("❌ {} was already {}.", want.description, status);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn cmd_wants_reject(
    db: &Database,
    config: &Config,
    id_or_description: &str,
    today: NaiveDate,
) -> Result<()> {
    sweep(db, config, today)?;

    let want = db
        .find_want(id_or_description)?
        .ok_or_else(|| anyhow::anyhow!("Want not found: {}", id_or_description))?;

    match wants::reject(&want, today) {
        Ok(rejected) => {
            db.update_want_status(rejected.id, rejected.status, rejected.decided_on)?;
            println!(
                "✅ Rejected: {}. {} stays in your pocket.",
                rejected.description,
                money::format_usd(rejected.amount)
            );
        }
        Err(Error::WantAlreadyDecided { status }) => {
            println!("❌ {} was already {}.", want.description, status);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
