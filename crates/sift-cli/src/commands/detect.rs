//! Recurrence detection command

use anyhow::Result;
use chrono::NaiveDate;
use sift_core::{detect, Config, Database, Ledger, SubscriptionStatus};

pub fn cmd_detect(db: &Database, config: &Config, as_of: NaiveDate) -> Result<()> {
    let transactions = db.list_transactions()?;
    if transactions.is_empty() {
        println!("Ledger is empty. Run:");
        println!("  sift import --file <transactions.csv>");
        return Ok(());
    }

    let (ledger, stats) = Ledger::new(transactions, as_of);
    if stats.skipped > 0 {
        println!("⚠️  {} stored transactions are future-dated; ignored", stats.skipped);
    }

    let overrides = db.merchant_overrides()?;
    let subscriptions = detect::detect(&ledger, &config.detector, &overrides, as_of);
    db.replace_subscriptions(&subscriptions)?;

    let active = subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .count();
    let lapsed = subscriptions.len() - active;

    println!(
        "✅ Detection complete: {} recurring charges ({} active, {} lapsed)",
        subscriptions.len(),
        active,
        lapsed
    );
    if !overrides.dismissed.is_empty() {
        println!("   {} dismissed merchants suppressed", overrides.dismissed.len());
    }
    println!("   See them: sift subscriptions");

    Ok(())
}
