//! Database tests

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_tx(hash: &str, d: &str, merchant: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        account_id: "checking".into(),
        date: date(d),
        merchant: merchant.into(),
        amount: amount.parse().unwrap(),
        category: Some("Entertainment".into()),
        import_hash: hash.into(),
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
    assert!(db.list_subscriptions().unwrap().is_empty());
}

#[test]
fn test_transaction_insert_dedup_round_trip() {
    let db = Database::in_memory().unwrap();

    let batch = vec![
        new_tx("h1", "2024-01-05", "NETFLIX.COM*12345", "-15.49"),
        new_tx("h2", "2024-02-04", "NETFLIX.COM*98765", "-15.49"),
    ];
    let outcome = db.insert_transactions(&batch).unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.duplicates, 0);

    // Re-importing the same file is a no-op
    let outcome = db.insert_transactions(&batch).unwrap();
    assert_eq!(outcome.inserted, 0);
    assert_eq!(outcome.duplicates, 2);

    let stored = db.list_transactions().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].date, date("2024-01-05"));
    assert_eq!(stored[0].amount, dec!(-15.49));
    assert_eq!(stored[0].category.as_deref(), Some("Entertainment"));
}

#[test]
fn test_subscription_replace_round_trip() {
    let db = Database::in_memory().unwrap();

    let sub = Subscription {
        merchant: "NETFLIX.COM".into(),
        average_interval_days: 30.25,
        interval_stddev: 0.83,
        average_amount: dec!(15.49),
        occurrences: 5,
        confidence: Confidence::Medium,
        first_seen: date("2024-01-05"),
        last_seen: date("2024-05-04"),
        status: SubscriptionStatus::Active,
    };
    db.replace_subscriptions(std::slice::from_ref(&sub)).unwrap();

    let stored = db.list_subscriptions().unwrap();
    assert_eq!(stored, vec![sub.clone()]);

    // A later run replaces, never accumulates
    let lapsed = Subscription {
        merchant: "HULU.COM".into(),
        status: SubscriptionStatus::Lapsed,
        ..sub
    };
    db.replace_subscriptions(std::slice::from_ref(&lapsed)).unwrap();
    let stored = db.list_subscriptions().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].merchant, "HULU.COM");
    assert_eq!(stored[0].status, SubscriptionStatus::Lapsed);
}

#[test]
fn test_merchant_overrides() {
    let db = Database::in_memory().unwrap();

    db.set_merchant_override("NETFLIX.COM", MerchantOverride::Dismissed)
        .unwrap();
    db.set_merchant_override("AWS BILLING", MerchantOverride::Confirmed)
        .unwrap();

    let overrides = db.merchant_overrides().unwrap();
    assert!(overrides.dismissed.contains("NETFLIX.COM"));
    assert!(overrides.confirmed.contains("AWS BILLING"));

    // Flipping an override replaces it
    db.set_merchant_override("NETFLIX.COM", MerchantOverride::Confirmed)
        .unwrap();
    let overrides = db.merchant_overrides().unwrap();
    assert!(!overrides.dismissed.contains("NETFLIX.COM"));
    assert!(overrides.confirmed.contains("NETFLIX.COM"));

    assert!(db.clear_merchant_override("netflix.com").unwrap());
    assert!(!db.clear_merchant_override("netflix.com").unwrap());
}

#[test]
fn test_want_lifecycle_round_trip() {
    let db = Database::in_memory().unwrap();

    let id = db
        .add_want("standing desk", dec!(450.00), date("2024-03-01"), 30)
        .unwrap();
    let want = db.get_want(id).unwrap().unwrap();
    assert_eq!(want.status, WantStatus::Pending);
    assert_eq!(want.amount, dec!(450.00));
    assert_eq!(want.cooling_off_days, 30);
    assert!(want.decided_on.is_none());

    db.update_want_status(id, WantStatus::Approved, Some(date("2024-04-01")))
        .unwrap();
    let want = db.get_want(id).unwrap().unwrap();
    assert_eq!(want.status, WantStatus::Approved);
    assert_eq!(want.decided_on, Some(date("2024-04-01")));

    // Lookup by description, case-insensitive
    let found = db.find_want("Standing Desk").unwrap().unwrap();
    assert_eq!(found.id, id);
    assert!(db.find_want("999").unwrap().is_none());
}

#[test]
fn test_debt_account_upsert() {
    let db = Database::in_memory().unwrap();

    let card = DebtAccount {
        name: "Visa".into(),
        balance: dec!(1000),
        apr: dec!(20),
        minimum_payment: dec!(25),
    };
    db.upsert_debt_account(&card).unwrap();

    // Refreshing the snapshot updates in place
    let card = DebtAccount {
        balance: dec!(931.67),
        ..card
    };
    db.upsert_debt_account(&card).unwrap();

    let accounts = db.list_debt_accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].balance, dec!(931.67));

    assert!(db.remove_debt_account("Visa").unwrap());
    assert!(!db.remove_debt_account("Visa").unwrap());
}

#[test]
fn test_inventory_item_round_trip() {
    let db = Database::in_memory().unwrap();

    let item = RecurringPurchaseItem {
        name: "dog food".into(),
        merchant: "CHEWY.COM".into(),
        typical_interval_days: 20.5,
        interval_stddev: 1.2,
        last_purchase_date: date("2024-03-01"),
        purchase_history: vec![date("2024-02-09"), date("2024-03-01")],
    };
    db.upsert_inventory_item(&item).unwrap();

    let stored = db.get_inventory_item("Dog Food").unwrap().unwrap();
    assert_eq!(stored, item);

    // Recording a purchase updates the same row
    let updated = crate::inventory::record_purchase(&item, date("2024-03-20"));
    db.upsert_inventory_item(&updated).unwrap();
    let items = db.list_inventory_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].purchase_history.len(), 3);

    assert!(db.remove_inventory_item("dog food").unwrap());
    assert!(db.list_inventory_items().unwrap().is_empty());
}

#[test]
fn test_reset_clears_all_tables() {
    let db = Database::in_memory().unwrap();
    db.insert_transactions(&[new_tx("h1", "2024-01-05", "X", "-1.00")])
        .unwrap();
    db.add_want("thing", dec!(10), date("2024-01-01"), 30).unwrap();
    db.reset().unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
    assert!(db.list_wants().unwrap().is_empty());
}
