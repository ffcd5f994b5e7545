//! Debt payoff simulation
//!
//! Projects month-by-month payoff schedules for a set of debt accounts under
//! a fixed monthly budget, using either the avalanche (highest APR first) or
//! snowball (smallest balance first) allocation strategy.
//!
//! The simulation never touches real accounts; it works on discarded copies.
//! All arithmetic is decimal with one half-up rounding to the cent per
//! account per month, after interest and after payment, so a 600-month run
//! produces exactly reproducible numbers.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AccountMonth, DebtAccount, MonthSnapshot, PayoffPlan, Strategy};
use crate::money::round_currency;

/// Safety cap: a plan that cannot clear all balances within 50 years is
/// reported as non-convergent rather than silently truncated.
pub const MAX_MONTHS: u32 = 600;

#[derive(Debug, Clone)]
struct WorkingAccount {
    name: String,
    balance: Decimal,
    apr: Decimal,
    minimum_payment: Decimal,
    month_payment: Decimal,
    month_interest: Decimal,
}

/// Simulate paying off `accounts` with `monthly_budget` under `strategy`
///
/// Fails with [`Error::InsufficientBudget`] when the budget cannot cover the
/// minimum payments, and with [`Error::NonConvergent`] (partial plan
/// attached) when balances do not reach zero within [`MAX_MONTHS`].
pub fn simulate(
    accounts: &[DebtAccount],
    monthly_budget: Decimal,
    strategy: Strategy,
) -> Result<PayoffPlan> {
    for acc in accounts {
        if acc.balance < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "debt account {} has negative balance",
                acc.name
            )));
        }
        if acc.apr < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "debt account {} has negative APR",
                acc.name
            )));
        }
        if acc.minimum_payment < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "debt account {} has negative minimum payment",
                acc.name
            )));
        }
    }

    // Accounts arrive fresh each run; one already at zero has nothing to pay
    let mut open: Vec<WorkingAccount> = accounts
        .iter()
        .filter(|a| a.balance > Decimal::ZERO)
        .map(|a| WorkingAccount {
            name: a.name.clone(),
            balance: round_currency(a.balance),
            apr: a.apr,
            minimum_payment: a.minimum_payment,
            month_payment: Decimal::ZERO,
            month_interest: Decimal::ZERO,
        })
        .collect();

    let required: Decimal = open.iter().map(|a| a.minimum_payment).sum();
    if monthly_budget < required {
        return Err(Error::InsufficientBudget {
            required,
            budget: monthly_budget,
        });
    }

    let mut plan = PayoffPlan {
        strategy,
        monthly_budget,
        months: Vec::new(),
    };

    if open.is_empty() {
        return Ok(plan);
    }

    for month in 1..=MAX_MONTHS {
        // 1. Accrue interest on every open account
        for acc in &mut open {
            let interest = round_currency(acc.balance * acc.apr / Decimal::from(1200));
            acc.balance = round_currency(acc.balance + interest);
            acc.month_interest = interest;
            acc.month_payment = Decimal::ZERO;
        }

        // 2. Minimum payment to every account, capped at its balance.
        //    An unapplied remainder stays in the month's pool.
        let mut remaining = monthly_budget;
        for acc in &mut open {
            let pay = acc.minimum_payment.min(acc.balance);
            acc.balance = round_currency(acc.balance - pay);
            acc.month_payment += pay;
            remaining -= pay;
        }

        // 3. Order by the strategy's tie-break key
        match strategy {
            Strategy::Avalanche => open.sort_by(|a, b| {
                b.apr
                    .cmp(&a.apr)
                    .then_with(|| b.balance.cmp(&a.balance))
                    .then_with(|| a.name.cmp(&b.name))
            }),
            Strategy::Snowball => open.sort_by(|a, b| {
                a.balance
                    .cmp(&b.balance)
                    .then_with(|| b.apr.cmp(&a.apr))
                    .then_with(|| a.name.cmp(&b.name))
            }),
        }

        // 4. Cascade the rest of the budget down the ordered accounts
        //    within the same month
        for acc in &mut open {
            if remaining <= Decimal::ZERO {
                break;
            }
            let pay = remaining.min(acc.balance);
            acc.balance = round_currency(acc.balance - pay);
            acc.month_payment += pay;
            remaining -= pay;
        }

        // 5. Record the snapshot; accounts that reached zero this month
        //    appear one last time, then drop out (their minimum is freed
        //    for the accounts that remain)
        plan.months.push(MonthSnapshot {
            month,
            accounts: open
                .iter()
                .map(|a| {
                    (
                        a.name.clone(),
                        AccountMonth {
                            payment: a.month_payment,
                            interest: a.month_interest,
                            balance: a.balance,
                        },
                    )
                })
                .collect(),
        });

        open.retain(|a| a.balance > Decimal::ZERO);
        if open.is_empty() {
            debug!(strategy = %strategy, months = month, "all balances cleared");
            return Ok(plan);
        }
    }

    debug!(strategy = %strategy, "simulation hit the month cap without clearing balances");
    Err(Error::NonConvergent {
        months: MAX_MONTHS,
        plan: Box::new(plan),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account(name: &str, balance: Decimal, apr: Decimal, minimum: Decimal) -> DebtAccount {
        DebtAccount {
            name: name.into(),
            balance,
            apr,
            minimum_payment: minimum,
        }
    }

    /// The worked example: A(1000 @ 20%, min 25), B(500 @ 10%, min 15),
    /// budget 100. Avalanche sends all 60 extra to A; snowball to B.
    fn two_accounts() -> Vec<DebtAccount> {
        vec![
            account("A", dec!(1000), dec!(20), dec!(25)),
            account("B", dec!(500), dec!(10), dec!(15)),
        ]
    }

    #[test]
    fn test_avalanche_attacks_highest_apr() {
        let plan = simulate(&two_accounts(), dec!(100), Strategy::Avalanche).unwrap();
        let first = &plan.months[0];
        // A: interest 1000*20/1200 = 16.67; minimum 25 + extra 60 = 85
        let a = &first.accounts["A"];
        assert_eq!(a.interest, dec!(16.67));
        assert_eq!(a.payment, dec!(85));
        assert_eq!(a.balance, dec!(931.67));
        // B: interest 500*10/1200 = 4.17; minimum only
        let b = &first.accounts["B"];
        assert_eq!(b.interest, dec!(4.17));
        assert_eq!(b.payment, dec!(15));
        assert_eq!(b.balance, dec!(489.17));
    }

    #[test]
    fn test_snowball_attacks_smallest_balance() {
        let plan = simulate(&two_accounts(), dec!(100), Strategy::Snowball).unwrap();
        let first = &plan.months[0];
        let a = &first.accounts["A"];
        assert_eq!(a.payment, dec!(25));
        let b = &first.accounts["B"];
        assert_eq!(b.payment, dec!(75));
    }

    #[test]
    fn test_insufficient_budget() {
        let err = simulate(&two_accounts(), dec!(39.99), Strategy::Avalanche).unwrap_err();
        match err {
            Error::InsufficientBudget { required, budget } => {
                assert_eq!(required, dec!(40));
                assert_eq!(budget, dec!(39.99));
            }
            other => panic!("expected InsufficientBudget, got {:?}", other),
        }
        // Exactly covering the minimums is feasible
        assert!(simulate(&two_accounts(), dec!(40), Strategy::Avalanche).is_ok());
    }

    #[test]
    fn test_idempotent() {
        let a = simulate(&two_accounts(), dec!(100), Strategy::Avalanche).unwrap();
        let b = simulate(&two_accounts(), dec!(100), Strategy::Avalanche).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_avalanche_interest_no_worse_than_snowball() {
        let avalanche = simulate(&two_accounts(), dec!(100), Strategy::Avalanche).unwrap();
        let snowball = simulate(&two_accounts(), dec!(100), Strategy::Snowball).unwrap();
        assert!(avalanche.total_interest() <= snowball.total_interest());

        // And the high-APR account clears no later under avalanche
        let av_month = avalanche.payoff_month("A").unwrap();
        let sb_month = snowball.payoff_month("A").unwrap();
        assert!(av_month <= sb_month);
    }

    #[test]
    fn test_freed_minimum_rolls_forward() {
        // B is small and clears quickly under snowball; afterwards its
        // minimum must flow to A
        let plan = simulate(&two_accounts(), dec!(100), Strategy::Snowball).unwrap();
        let b_payoff = plan.payoff_month("B").unwrap();
        let next = &plan.months[b_payoff as usize]; // month after payoff
        assert!(!next.accounts.contains_key("B"));
        // With B gone the whole budget lands on A
        assert_eq!(next.accounts["A"].payment, dec!(100));
    }

    #[test]
    fn test_cascade_within_single_month() {
        // Extra budget clears the first account mid-month and rolls into the
        // next one in the same month
        let accounts = vec![
            account("high", dec!(50), dec!(30), dec!(10)),
            account("low", dec!(900), dec!(5), dec!(20)),
        ];
        let plan = simulate(&accounts, dec!(500), Strategy::Avalanche).unwrap();
        let first = &plan.months[0];
        // high: 50 + 1.25 interest = 51.25, fully paid
        assert_eq!(first.accounts["high"].balance, dec!(0));
        assert_eq!(first.accounts["high"].payment, dec!(51.25));
        // low: 900 + 3.75 interest = 903.75; gets 20 min + (470 - 41.25) extra
        assert_eq!(first.accounts["low"].payment, dec!(448.75));
        assert_eq!(first.accounts["low"].balance, dec!(455.00));
    }

    #[test]
    fn test_zero_apr_payoff() {
        let accounts = vec![account("loan", dec!(300), dec!(0), dec!(100))];
        let plan = simulate(&accounts, dec!(100), Strategy::Avalanche).unwrap();
        assert_eq!(plan.months_to_debt_free(), 3);
        assert_eq!(plan.total_interest(), dec!(0));
        assert_eq!(plan.total_paid(), dec!(300));
    }

    #[test]
    fn test_minimum_capped_at_balance() {
        // Minimum exceeds what's owed; only the balance is paid and the
        // account closes the first month
        let accounts = vec![
            account("stub", dec!(10), dec!(0), dec!(50)),
            account("big", dec!(500), dec!(12), dec!(25)),
        ];
        let plan = simulate(&accounts, dec!(100), Strategy::Avalanche).unwrap();
        let first = &plan.months[0];
        assert_eq!(first.accounts["stub"].payment, dec!(10));
        assert_eq!(first.accounts["stub"].balance, dec!(0));
        // The 40 not spent on stub's minimum joined the extra pool
        assert_eq!(first.accounts["big"].payment, dec!(90));
    }

    #[test]
    fn test_non_convergent_surfaces_partial_plan() {
        // Interest outruns the payments forever
        let accounts = vec![account("abyss", dec!(10000), dec!(60), dec!(100))];
        let err = simulate(&accounts, dec!(100), Strategy::Avalanche).unwrap_err();
        match err {
            Error::NonConvergent { months, plan } => {
                assert_eq!(months, MAX_MONTHS);
                assert_eq!(plan.months.len(), MAX_MONTHS as usize);
                // Balance grew, not shrank
                let last = plan.months.last().unwrap();
                assert!(last.accounts["abyss"].balance > dec!(10000));
            }
            other => panic!("expected NonConvergent, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_balance_account_skipped() {
        let accounts = vec![
            account("done", dec!(0), dec!(20), dec!(35)),
            account("open", dec!(100), dec!(10), dec!(10)),
        ];
        // done's minimum does not count toward feasibility
        let plan = simulate(&accounts, dec!(10), Strategy::Avalanche).unwrap();
        assert!(!plan.months[0].accounts.contains_key("done"));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let accounts = vec![account("bad", dec!(-5), dec!(10), dec!(5))];
        assert!(matches!(
            simulate(&accounts, dec!(100), Strategy::Avalanche),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_no_accounts_yields_empty_plan() {
        let plan = simulate(&[], dec!(100), Strategy::Avalanche).unwrap();
        assert!(plan.months.is_empty());
        assert_eq!(plan.total_interest(), dec!(0));
    }
}
