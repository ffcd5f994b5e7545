//! Subscription command implementations

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sift_core::{money, Config, Database, MerchantOverride, SubscriptionStatus};

use super::{detect::cmd_detect, truncate};

pub fn cmd_subscriptions_list(db: &Database) -> Result<()> {
    let subscriptions = db.list_subscriptions()?;

    if subscriptions.is_empty() {
        println!("No subscriptions detected yet. Run:");
        println!("  sift detect");
        return Ok(());
    }

    println!();
    println!("📋 Detected Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    let mut monthly_total = Decimal::ZERO;
    for sub in &subscriptions {
        let status_icon = match sub.status {
            SubscriptionStatus::Active => "✅",
            SubscriptionStatus::Lapsed => "💤",
        };

        println!(
            "   {} {:24} │ {:>9}/mo │ every {:>3.0}d ±{:<4.1} │ {:6} │ last {}",
            status_icon,
            truncate(&sub.merchant, 24),
            money::format_usd(sub.monthly_cost()),
            sub.average_interval_days,
            sub.interval_stddev,
            sub.confidence.as_str(),
            sub.last_seen
        );

        if sub.status == SubscriptionStatus::Active {
            monthly_total += sub.monthly_cost();
        }
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Active total: {}/mo ({}/yr)",
        money::format_usd(monthly_total),
        money::format_usd(monthly_total * Decimal::from(12))
    );
    println!();
    println!("   Not a subscription? sift subscriptions dismiss <merchant>");

    Ok(())
}

pub fn cmd_subscriptions_dismiss(
    db: &Database,
    config: &Config,
    merchant: &str,
    as_of: NaiveDate,
) -> Result<()> {
    db.set_merchant_override(merchant, MerchantOverride::Dismissed)?;
    println!("✅ {} dismissed; it won't be flagged again", merchant.to_uppercase());

    // Refresh stored results so the list reflects the override immediately
    cmd_detect(db, config, as_of)
}

pub fn cmd_subscriptions_confirm(
    db: &Database,
    config: &Config,
    merchant: &str,
    as_of: NaiveDate,
) -> Result<()> {
    db.set_merchant_override(merchant, MerchantOverride::Confirmed)?;
    println!(
        "✅ {} confirmed; it will be reported whenever its cadence qualifies",
        merchant.to_uppercase()
    );

    cmd_detect(db, config, as_of)
}

pub fn cmd_subscriptions_reset(
    db: &Database,
    config: &Config,
    merchant: &str,
    as_of: NaiveDate,
) -> Result<()> {
    if db.clear_merchant_override(merchant)? {
        println!("✅ Override removed for {}", merchant.to_uppercase());
        cmd_detect(db, config, as_of)
    } else {
        println!("No override stored for {}", merchant.to_uppercase());
        Ok(())
    }
}

pub fn cmd_subscriptions_overrides(db: &Database) -> Result<()> {
    let overrides = db.list_merchant_overrides()?;

    if overrides.is_empty() {
        println!("No merchant overrides stored.");
        return Ok(());
    }

    println!();
    println!("📋 Merchant Overrides");
    for (merchant, kind) in overrides {
        let icon = match kind {
            MerchantOverride::Dismissed => "🚫",
            MerchantOverride::Confirmed => "✅",
        };
        println!("   {} {:30} {}", icon, truncate(&merchant, 30), kind);
    }

    Ok(())
}
