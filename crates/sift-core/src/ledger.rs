//! The transaction ledger
//!
//! An ordered, validated collection of transactions. Pure data: every
//! analyzer reads from it, nothing writes back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::Transaction;

/// Counts from building a ledger out of raw records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerStats {
    pub accepted: usize,
    /// Records rejected by validation (future-dated past the sync time)
    pub skipped: usize,
}

/// Date-ordered transaction collection
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Build a ledger from imported records
    ///
    /// Records dated after `as_of` (the sync time) violate the ledger
    /// invariant; they are dropped and counted rather than failing the
    /// whole batch.
    pub fn new(records: Vec<Transaction>, as_of: NaiveDate) -> (Self, LedgerStats) {
        let total = records.len();
        let mut transactions: Vec<Transaction> =
            records.into_iter().filter(|t| t.date <= as_of).collect();
        let skipped = total - transactions.len();
        if skipped > 0 {
            warn!(skipped, "dropped future-dated transactions from ledger");
        }
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        (
            Self { transactions },
            LedgerStats {
                accepted: total - skipped,
                skipped,
            },
        )
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Debits only (money leaving the account)
    pub fn debits(&self) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions.iter().filter(|t| t.amount < Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest and latest transaction dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.transactions.first(), self.transactions.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: i64, d: &str, amount: Decimal) -> Transaction {
        Transaction {
            id,
            account_id: "checking".into(),
            date: date(d),
            merchant: "MERCHANT".into(),
            amount,
            category: None,
            import_hash: format!("hash-{}", id),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_orders_by_date() {
        let records = vec![
            tx(1, "2024-03-10", dec!(-5)),
            tx(2, "2024-01-02", dec!(-5)),
            tx(3, "2024-02-20", dec!(-5)),
        ];
        let (ledger, stats) = Ledger::new(records, date("2024-04-01"));
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.skipped, 0);
        let dates: Vec<_> = ledger.transactions().iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-02"), date("2024-02-20"), date("2024-03-10")]
        );
        assert_eq!(
            ledger.date_range(),
            Some((date("2024-01-02"), date("2024-03-10")))
        );
    }

    #[test]
    fn test_drops_future_dated() {
        let records = vec![
            tx(1, "2024-03-10", dec!(-5)),
            tx(2, "2024-06-01", dec!(-5)),
        ];
        let (ledger, stats) = Ledger::new(records, date("2024-04-01"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_debits_excludes_credits() {
        let records = vec![
            tx(1, "2024-03-10", dec!(-5)),
            tx(2, "2024-03-11", dec!(1200)),
        ];
        let (ledger, _) = Ledger::new(records, date("2024-04-01"));
        assert_eq!(ledger.debits().count(), 1);
    }
}
