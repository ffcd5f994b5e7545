//! Domain models for sift

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// A financial transaction
///
/// Immutable once imported. Negative amount = debit (money leaving the
/// account), positive = credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: String,
    pub date: NaiveDate,
    /// Raw merchant descriptor as it appeared on the statement
    pub merchant: String,
    pub amount: Decimal,
    pub category: Option<String>,
    /// Hash for deduplication across repeated imports
    pub import_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A transaction parsed from an import file (before DB insertion)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: String,
    pub date: NaiveDate,
    pub merchant: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub import_hash: String,
}

/// Lifecycle of a detected subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Charges are still arriving on schedule
    Active,
    /// No charge seen for well past the usual interval
    Lapsed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Lapsed => "lapsed",
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "lapsed" => Ok(Self::Lapsed),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much history backs a subscription classification
///
/// A classification, not a probability: a group with only the minimum
/// number of occurrences ranks low regardless of how clean its cadence is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring charge detected from transaction patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Normalized merchant identity key
    pub merchant: String,
    pub average_interval_days: f64,
    pub interval_stddev: f64,
    pub average_amount: Decimal,
    pub occurrences: usize,
    pub confidence: Confidence,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Estimated monthly cost, prorated from the charge interval
    pub fn monthly_cost(&self) -> Decimal {
        if self.average_interval_days <= 0.0 {
            return Decimal::ZERO;
        }
        let interval =
            Decimal::try_from(self.average_interval_days).unwrap_or(Decimal::ONE);
        money::round_currency(self.average_amount * Decimal::from(30) / interval)
    }

    /// Estimated annual cost
    pub fn annual_cost(&self) -> Decimal {
        money::round_currency(self.monthly_cost() * Decimal::from(12))
    }
}

/// A user override on a merchant identity, persisted across detection runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantOverride {
    /// Never report this merchant as a subscription again
    Dismissed,
    /// Report this merchant whenever its cadence qualifies, skipping the
    /// amount/timing classification tests
    Confirmed,
}

impl MerchantOverride {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dismissed => "dismissed",
            Self::Confirmed => "confirmed",
        }
    }
}

impl std::str::FromStr for MerchantOverride {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dismissed" => Ok(Self::Dismissed),
            "confirmed" => Ok(Self::Confirmed),
            _ => Err(format!("Unknown merchant override: {}", s)),
        }
    }
}

impl std::fmt::Display for MerchantOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debt account (credit card, loan) supplied fresh for each simulation
///
/// Only the simulator's working copies are ever mutated; the stored account
/// is a snapshot of the real one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAccount {
    pub name: String,
    /// Current balance owed, non-negative
    pub balance: Decimal,
    /// Annual percentage rate, as a percentage (21.5 = 21.5% APR)
    pub apr: Decimal,
    pub minimum_payment: Decimal,
}

impl DebtAccount {
    /// Interest this balance accrues in one month at the current APR
    pub fn monthly_interest(&self) -> Decimal {
        money::round_currency(self.balance * self.apr / Decimal::from(1200))
    }
}

/// Debt payoff allocation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest APR first: minimizes total interest paid
    Avalanche,
    /// Smallest balance first: maximizes early wins
    Snowball,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avalanche" => Ok(Self::Avalanche),
            "snowball" => Ok(Self::Snowball),
            _ => Err(format!("Unknown strategy: {} (use avalanche or snowball)", s)),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One account's activity within a simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountMonth {
    /// Total paid this month (minimum plus any extra)
    pub payment: Decimal,
    /// Interest accrued at the start of the month
    pub interest: Decimal,
    /// Balance remaining at the end of the month
    pub balance: Decimal,
}

/// All account activity for one simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSnapshot {
    /// 1-based month index
    pub month: u32,
    /// Keyed by account name; accounts paid off in earlier months are absent
    pub accounts: BTreeMap<String, AccountMonth>,
}

/// Month-by-month projection of a payoff strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub strategy: Strategy,
    pub monthly_budget: Decimal,
    pub months: Vec<MonthSnapshot>,
}

impl PayoffPlan {
    /// Months until every balance reaches zero
    pub fn months_to_debt_free(&self) -> usize {
        self.months.len()
    }

    /// Total interest accrued across the whole plan
    pub fn total_interest(&self) -> Decimal {
        self.months
            .iter()
            .flat_map(|m| m.accounts.values())
            .map(|a| a.interest)
            .sum()
    }

    /// Total paid across the whole plan
    pub fn total_paid(&self) -> Decimal {
        self.months
            .iter()
            .flat_map(|m| m.accounts.values())
            .map(|a| a.payment)
            .sum()
    }

    /// The month a named account reaches zero balance, if it does
    pub fn payoff_month(&self, name: &str) -> Option<u32> {
        self.months
            .iter()
            .find(|m| {
                m.accounts
                    .get(name)
                    .is_some_and(|a| a.balance == Decimal::ZERO)
            })
            .map(|m| m.month)
    }
}

/// Lifecycle of a discretionary purchase candidate
///
/// All transitions out of `Pending` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WantStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl WantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl std::str::FromStr for WantStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(format!("Unknown want status: {}", s)),
        }
    }
}

impl std::fmt::Display for WantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discretionary purchase candidate gated behind a cooling-off period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Want {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub requested_date: NaiveDate,
    pub cooling_off_days: u32,
    pub status: WantStatus,
    /// Date the terminal transition happened, if it has
    pub decided_on: Option<NaiveDate>,
}

impl Want {
    /// First date the want may be confirmed
    pub fn eligible_on(&self) -> NaiveDate {
        self.requested_date + Duration::days(i64::from(self.cooling_off_days))
    }

    /// Last date the want may be confirmed before it expires
    pub fn expires_on(&self, grace_period_days: u32) -> NaiveDate {
        self.eligible_on() + Duration::days(i64::from(grace_period_days))
    }

    /// Can the user act on this want today?
    pub fn is_actionable(&self, today: NaiveDate, grace_period_days: u32) -> bool {
        self.status == WantStatus::Pending
            && today >= self.eligible_on()
            && today <= self.expires_on(grace_period_days)
    }

    pub fn days_until_eligible(&self, today: NaiveDate) -> i64 {
        (self.eligible_on() - today).num_days().max(0)
    }
}

/// A consumable recurring purchase tracked for restocking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringPurchaseItem {
    pub name: String,
    /// Normalized merchant identity the item is bought from
    pub merchant: String,
    /// Estimated days between purchases, derived from purchase history
    pub typical_interval_days: f64,
    pub interval_stddev: f64,
    pub last_purchase_date: NaiveDate,
    /// Every recorded purchase date, ascending
    pub purchase_history: Vec<NaiveDate>,
}

impl RecurringPurchaseItem {
    /// When the current supply is projected to run out
    pub fn estimated_depletion_date(&self) -> NaiveDate {
        self.last_purchase_date + Duration::days(self.typical_interval_days.round() as i64)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today >= self.estimated_depletion_date()
    }

    pub fn days_until_depletion(&self, today: NaiveDate) -> i64 {
        (self.estimated_depletion_date() - today).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_subscription_monthly_cost() {
        let sub = Subscription {
            merchant: "NETFLIX.COM".into(),
            average_interval_days: 30.0,
            interval_stddev: 0.5,
            average_amount: dec!(15.49),
            occurrences: 6,
            confidence: Confidence::Medium,
            first_seen: date("2024-01-05"),
            last_seen: date("2024-06-05"),
            status: SubscriptionStatus::Active,
        };
        assert_eq!(sub.monthly_cost(), dec!(15.49));
        assert_eq!(sub.annual_cost(), dec!(185.88));

        let weekly = Subscription {
            average_interval_days: 7.0,
            ..sub
        };
        // 15.49 * 30 / 7 = 66.385..., rounded half-up
        assert_eq!(weekly.monthly_cost(), dec!(66.39));
    }

    #[test]
    fn test_want_dates() {
        let want = Want {
            id: 1,
            description: "standing desk".into(),
            amount: dec!(450.00),
            requested_date: date("2024-03-01"),
            cooling_off_days: 30,
            status: WantStatus::Pending,
            decided_on: None,
        };
        assert_eq!(want.eligible_on(), date("2024-03-31"));
        assert_eq!(want.expires_on(14), date("2024-04-14"));
        assert!(!want.is_actionable(date("2024-03-30"), 14));
        assert!(want.is_actionable(date("2024-03-31"), 14));
        assert!(want.is_actionable(date("2024-04-14"), 14));
        assert!(!want.is_actionable(date("2024-04-15"), 14));
        assert_eq!(want.days_until_eligible(date("2024-03-21")), 10);
        assert_eq!(want.days_until_eligible(date("2024-05-01")), 0);
    }

    #[test]
    fn test_item_depletion() {
        let item = RecurringPurchaseItem {
            name: "coffee beans".into(),
            merchant: "BLUE BOTTLE".into(),
            typical_interval_days: 13.6,
            interval_stddev: 1.2,
            last_purchase_date: date("2024-05-01"),
            purchase_history: vec![date("2024-04-17"), date("2024-05-01")],
        };
        // 13.6 rounds to 14 days
        assert_eq!(item.estimated_depletion_date(), date("2024-05-15"));
        assert!(!item.is_expired(date("2024-05-14")));
        assert!(item.is_expired(date("2024-05-15")));
        assert_eq!(item.days_until_depletion(date("2024-05-10")), 5);
    }

    #[test]
    fn test_strategy_round_trip() {
        assert_eq!("avalanche".parse::<Strategy>().unwrap(), Strategy::Avalanche);
        assert_eq!("Snowball".parse::<Strategy>().unwrap(), Strategy::Snowball);
        assert!("payoff".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Avalanche.to_string(), "avalanche");
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }
}
