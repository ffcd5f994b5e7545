//! Recurring-charge detection
//!
//! Finds subscriptions by analyzing actual transaction patterns rather than
//! merchant-name keywords: transactions are grouped by a normalized merchant
//! identity, and a group qualifies when both its charge timing and its charge
//! amounts are stable.
//!
//! Detection is a pure function over the ledger plus previously persisted
//! user overrides. A dismissed merchant is never re-flagged; a confirmed
//! merchant skips the stability tests.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::ledger::Ledger;
use crate::models::{Confidence, Subscription, SubscriptionStatus, Transaction};
use crate::money;
use crate::stats;

/// The hard floor for `min_occurrences`: below three charges an interval
/// cannot be established reliably.
const MIN_OCCURRENCES_FLOOR: usize = 3;

/// Groups with at least this many occurrences rank as high confidence
const HIGH_CONFIDENCE_OCCURRENCES: usize = 10;

/// Persisted user overrides, keyed by normalized merchant identity
#[derive(Debug, Clone, Default)]
pub struct MerchantOverrides {
    pub dismissed: HashSet<String>,
    pub confirmed: HashSet<String>,
}

impl MerchantOverrides {
    pub fn is_empty(&self) -> bool {
        self.dismissed.is_empty() && self.confirmed.is_empty()
    }
}

/// Detect recurring charges in the ledger
///
/// Pure function: same ledger, config, overrides, and analysis date always
/// produce the same subscriptions in the same order (confidence descending,
/// then merchant).
pub fn detect(
    ledger: &Ledger,
    config: &DetectorConfig,
    overrides: &MerchantOverrides,
    as_of: NaiveDate,
) -> Vec<Subscription> {
    let min_occurrences = if config.min_occurrences < MIN_OCCURRENCES_FLOOR {
        warn!(
            requested = config.min_occurrences,
            "min_occurrences below {} cannot establish an interval; clamping",
            MIN_OCCURRENCES_FLOOR
        );
        MIN_OCCURRENCES_FLOOR
    } else {
        config.min_occurrences
    };

    // Group debits by merchant identity. Credits (refunds, income) never
    // indicate a subscription.
    let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for tx in ledger.debits() {
        let key = normalize_merchant(&tx.merchant);
        if key.is_empty() {
            continue;
        }
        groups.entry(key).or_default().push(tx);
    }

    let mut subscriptions = Vec::new();

    for (merchant, mut txs) in groups {
        if overrides.dismissed.contains(&merchant) {
            debug!(%merchant, "skipping dismissed merchant");
            continue;
        }
        if txs.len() < min_occurrences {
            continue;
        }

        txs.sort_by_key(|t| t.date);

        let gaps: Vec<f64> = txs
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days() as f64)
            .collect();

        let avg_gap = stats::mean(&gaps);
        if avg_gap <= 0.0 {
            // Same-day duplicates only; no cadence to measure
            continue;
        }
        let gap_stddev = stats::std_dev_population(&gaps);

        let amounts: Vec<Decimal> = txs.iter().map(|t| t.amount.abs()).collect();
        let avg_amount = money::round_currency(
            amounts.iter().copied().sum::<Decimal>() / Decimal::from(amounts.len()),
        );
        if avg_amount <= Decimal::ZERO {
            continue;
        }

        let confirmed = overrides.confirmed.contains(&merchant);
        if !confirmed {
            // Timing must be regular: stddev within a fraction of the mean gap
            if gap_stddev > config.interval_stddev_ratio * avg_gap {
                debug!(
                    %merchant,
                    gap_stddev,
                    avg_gap,
                    "rejected: interval too irregular"
                );
                continue;
            }

            // Amounts must be stable: spread within a fraction of the mean.
            // Variable utility-style bills pass at the default 10%; one-off
            // charges that happen to land on a cadence do not.
            let max = amounts.iter().copied().max().unwrap_or(Decimal::ZERO);
            let min = amounts.iter().copied().min().unwrap_or(Decimal::ZERO);
            let spread_ratio = ((max - min) / avg_amount).to_f64().unwrap_or(f64::MAX);
            if spread_ratio > config.amount_variance_ratio {
                debug!(%merchant, spread_ratio, "rejected: amounts too variable");
                continue;
            }
        }

        let confidence = if txs.len() == min_occurrences {
            Confidence::Low
        } else if txs.len() >= HIGH_CONFIDENCE_OCCURRENCES {
            Confidence::High
        } else {
            Confidence::Medium
        };

        let first_seen = txs[0].date;
        let last_seen = txs[txs.len() - 1].date;

        // A subscription that hasn't charged for well past its usual
        // interval has likely been cancelled upstream.
        let days_since_last = (as_of - last_seen).num_days() as f64;
        let status = if days_since_last > config.lapse_factor * avg_gap {
            SubscriptionStatus::Lapsed
        } else {
            SubscriptionStatus::Active
        };

        debug!(
            %merchant,
            occurrences = txs.len(),
            avg_gap,
            gap_stddev,
            %avg_amount,
            ?status,
            "detected recurring charge"
        );

        subscriptions.push(Subscription {
            merchant,
            average_interval_days: avg_gap,
            interval_stddev: gap_stddev,
            average_amount: avg_amount,
            occurrences: txs.len(),
            confidence,
            first_seen,
            last_seen,
            status,
        });
    }

    subscriptions.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    subscriptions
}

fn trailing_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Digit runs glued to the end of a token are transaction or store IDs
    RE.get_or_init(|| Regex::new(r"\d{3,}$").expect("static pattern compiles"))
}

/// Normalize a raw merchant descriptor into an identity key
///
/// Case-folds, strips payment-processor boilerplate prefixes, drops
/// transaction/store ID tokens, and keeps the first three significant words.
pub fn normalize_merchant(descriptor: &str) -> String {
    let upper = descriptor.to_uppercase();

    // Processor prefixes vary per charge and say nothing about the merchant
    let stripped = upper
        .trim_start_matches("APLPAY ")
        .trim_start_matches("APPLEPAY ")
        .trim_start_matches("PAYPAL *")
        .trim_start_matches("PAYPAL ")
        .trim_start_matches("PP*")
        .trim_start_matches("SP * ")
        .trim_start_matches("SP *")
        .trim_start_matches("SQ * ")
        .trim_start_matches("SQ *")
        .trim_start_matches("TST* ")
        .trim_start_matches("TST*")
        .replace(['*', '#'], " ");

    stripped
        .split_whitespace()
        .map(|word| trailing_id_re().replace(word, "").into_owned())
        .filter(|word| !word.is_empty() && !word.chars().all(|c| c.is_ascii_digit()))
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}
