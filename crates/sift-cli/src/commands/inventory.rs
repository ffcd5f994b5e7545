//! Inventory command implementations

use anyhow::{bail, Result};
use chrono::NaiveDate;
use sift_core::{detect, inventory, Config, Database, RecurringPurchaseItem};

use super::{parse_date_arg, today, truncate};

pub fn cmd_inventory_list(db: &Database, as_of: NaiveDate) -> Result<()> {
    let items = db.list_inventory_items()?;

    if items.is_empty() {
        println!("No items tracked. Start with:");
        println!("  sift inventory add \"coffee beans\" --merchant \"BLUE BOTTLE\" --interval 14");
        return Ok(());
    }

    println!();
    println!("📦 Tracked Items");
    println!("   ─────────────────────────────────────────────────────────────");

    for item in &items {
        let icon = if item.is_expired(as_of) { "🚨" } else { "✅" };
        println!(
            "   {} {:24} │ every {:>5.1}d ±{:<4.1} │ last {} │ out ~{}",
            icon,
            truncate(&item.name, 24),
            item.typical_interval_days,
            item.interval_stddev,
            item.last_purchase_date,
            item.estimated_depletion_date()
        );
    }

    Ok(())
}

pub fn cmd_inventory_add(
    db: &Database,
    name: &str,
    merchant: &str,
    interval: f64,
    last_purchase: Option<&str>,
) -> Result<()> {
    if interval <= 0.0 {
        bail!("Interval must be positive");
    }
    let last_purchase_date = match last_purchase {
        Some(s) => parse_date_arg(s)?,
        None => today(),
    };

    let item = RecurringPurchaseItem {
        name: name.to_string(),
        merchant: detect::normalize_merchant(merchant),
        typical_interval_days: interval,
        interval_stddev: 0.0,
        last_purchase_date,
        purchase_history: vec![last_purchase_date],
    };
    db.upsert_inventory_item(&item)?;

    println!(
        "✅ Tracking {} from {} (every ~{} days)",
        item.name, item.merchant, interval
    );
    println!("   Projected to run out {}", item.estimated_depletion_date());
    Ok(())
}

pub fn cmd_inventory_record(db: &Database, name: &str, date: Option<&str>) -> Result<()> {
    let item = db
        .get_inventory_item(name)?
        .ok_or_else(|| anyhow::anyhow!("No tracked item named {}", name))?;

    let purchase_date = match date {
        Some(s) => parse_date_arg(s)?,
        None => today(),
    };

    let updated = inventory::record_purchase(&item, purchase_date);
    db.upsert_inventory_item(&updated)?;

    println!(
        "✅ Recorded {} purchase on {}; interval now ~{:.1} days",
        updated.name, purchase_date, updated.typical_interval_days
    );
    println!("   Next depletion ~{}", updated.estimated_depletion_date());
    Ok(())
}

/// Fold ledger transactions newer than each item's last purchase into its
/// history, matching on merchant identity
pub fn cmd_inventory_sync(db: &Database, as_of: NaiveDate) -> Result<()> {
    let items = db.list_inventory_items()?;
    if items.is_empty() {
        println!("No items tracked; nothing to sync.");
        return Ok(());
    }

    let transactions = db.list_transactions()?;
    let mut updates = 0usize;

    for item in items {
        let mut current = item;
        for tx in transactions.iter() {
            if tx.date <= as_of
                && tx.date > current.last_purchase_date
                && inventory::matches_item(&current, tx)
            {
                current = inventory::update(&current, tx);
                updates += 1;
            }
        }
        db.upsert_inventory_item(&current)?;
    }

    println!("✅ Sync complete: {} purchases folded in", updates);
    Ok(())
}

pub fn cmd_inventory_expiring(
    db: &Database,
    config: &Config,
    horizon: Option<u32>,
    as_of: NaiveDate,
) -> Result<()> {
    let horizon = horizon.unwrap_or(config.inventory.expiration_horizon_days);
    let items = db.list_inventory_items()?;
    let expiring = inventory::query_expiring(&items, horizon, as_of);

    if expiring.is_empty() {
        println!("Nothing runs out in the next {} days. 👍", horizon);
        return Ok(());
    }

    println!();
    println!("🛍️  Restock in the next {} days", horizon);
    for item in &expiring {
        let days = item.days_until_depletion(as_of);
        let note = if days < 0 {
            format!("out ~{} days ago", -days)
        } else if days == 0 {
            "runs out today".to_string()
        } else {
            format!("runs out in {} days", days)
        };
        println!("   {:24} {}", truncate(&item.name, 24), note);
    }

    Ok(())
}

pub fn cmd_inventory_remove(db: &Database, name: &str) -> Result<()> {
    if db.remove_inventory_item(name)? {
        println!("✅ Stopped tracking {}", name);
    } else {
        println!("❌ No tracked item named {}", name);
    }
    Ok(())
}
