//! Restock tracking for recurring physical purchases
//!
//! Consumables bought on a cadence (coffee, contact lenses, pet food) run
//! out on roughly the same cadence. Each item's typical purchase interval is
//! estimated from its own history with the same mean/stddev method the
//! recurrence detector uses, and the depletion date is projected from the
//! last purchase.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::detect::normalize_merchant;
use crate::models::{RecurringPurchaseItem, Transaction};
use crate::stats;

/// Fold a new matching purchase into the item
///
/// Recomputes the interval estimate from the full purchase history and moves
/// `last_purchase_date` forward. Returns the updated copy; the input is
/// untouched.
pub fn update(item: &RecurringPurchaseItem, new_transaction: &Transaction) -> RecurringPurchaseItem {
    record_purchase(item, new_transaction.date)
}

/// Record a purchase on the given date
pub fn record_purchase(item: &RecurringPurchaseItem, date: NaiveDate) -> RecurringPurchaseItem {
    let mut history = item.purchase_history.clone();
    history.push(date);
    history.sort();
    history.dedup();

    let gaps: Vec<f64> = history
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();

    // A single purchase gives no gap; keep the seeded estimate until a
    // second purchase establishes one
    let (typical_interval_days, interval_stddev) = if gaps.is_empty() {
        (item.typical_interval_days, 0.0)
    } else {
        (stats::mean(&gaps), stats::std_dev_population(&gaps))
    };

    let last_purchase_date = *history.last().expect("history has at least one purchase");

    debug!(
        item = %item.name,
        %last_purchase_date,
        typical_interval_days,
        "recorded purchase"
    );

    RecurringPurchaseItem {
        typical_interval_days,
        interval_stddev,
        last_purchase_date,
        purchase_history: history,
        ..item.clone()
    }
}

/// Does this transaction look like a purchase of this item?
pub fn matches_item(item: &RecurringPurchaseItem, tx: &Transaction) -> bool {
    normalize_merchant(&tx.merchant) == item.merchant
}

/// Items projected to run out within `horizon_days` of `today`
///
/// Includes items already past their depletion date. Sorted by soonest
/// depletion first, ties broken by name.
pub fn query_expiring(
    items: &[RecurringPurchaseItem],
    horizon_days: u32,
    today: NaiveDate,
) -> Vec<RecurringPurchaseItem> {
    let cutoff = today + Duration::days(i64::from(horizon_days));
    let mut expiring: Vec<RecurringPurchaseItem> = items
        .iter()
        .filter(|i| i.estimated_depletion_date() <= cutoff)
        .cloned()
        .collect();
    expiring.sort_by(|a, b| {
        a.estimated_depletion_date()
            .cmp(&b.estimated_depletion_date())
            .then_with(|| a.name.cmp(&b.name))
    });
    expiring
}
