//! Cooling-off tracking for discretionary purchases
//!
//! Every want sits out a mandatory waiting period before it can be approved.
//! There is deliberately no override path: confirming early fails, and that
//! is the feature. Wants left unconfirmed past a grace window expire so the
//! backlog cannot grow without bound.
//!
//! Nothing here polls; status is evaluated on demand from the current date
//! and the want's stored fields.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Want, WantStatus};

/// Approve a pending want
///
/// Only allowed once the cooling-off period has fully elapsed and before the
/// grace window closes. Fails with [`Error::TooEarly`] before the deadline
/// (the want stays pending) and [`Error::WantExpired`] after the grace
/// window (the sweep performs the actual expiry transition).
pub fn confirm(want: &Want, today: NaiveDate, grace_period_days: u32) -> Result<Want> {
    if want.status != WantStatus::Pending {
        return Err(Error::WantAlreadyDecided {
            status: want.status,
        });
    }
    let eligible_on = want.eligible_on();
    if today < eligible_on {
        return Err(Error::TooEarly { eligible_on });
    }
    let expires_on = want.expires_on(grace_period_days);
    if today > expires_on {
        return Err(Error::WantExpired {
            expired_on: expires_on,
        });
    }

    debug!(want = %want.description, "want approved");
    Ok(Want {
        status: WantStatus::Approved,
        decided_on: Some(today),
        ..want.clone()
    })
}

/// Cancel a pending want; allowed at any time
pub fn reject(want: &Want, today: NaiveDate) -> Result<Want> {
    if want.status != WantStatus::Pending {
        return Err(Error::WantAlreadyDecided {
            status: want.status,
        });
    }
    debug!(want = %want.description, "want rejected");
    Ok(Want {
        status: WantStatus::Rejected,
        decided_on: Some(today),
        ..want.clone()
    })
}

/// Expire pending wants whose grace window has closed
///
/// Returns only the wants that transitioned; callers persist those.
pub fn sweep_expired(wants: &[Want], today: NaiveDate, grace_period_days: u32) -> Vec<Want> {
    wants
        .iter()
        .filter(|w| w.status == WantStatus::Pending && today > w.expires_on(grace_period_days))
        .map(|w| {
            debug!(want = %w.description, "want expired without action");
            Want {
                status: WantStatus::Expired,
                decided_on: Some(today),
                ..w.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn want(requested: &str, cooling_off_days: u32) -> Want {
        Want {
            id: 1,
            description: "mechanical keyboard".into(),
            amount: dec!(180.00),
            requested_date: date(requested),
            cooling_off_days,
            status: WantStatus::Pending,
            decided_on: None,
        }
    }

    const GRACE: u32 = 14;

    #[test]
    fn test_confirm_one_day_early_fails() {
        let w = want("2024-03-01", 30);
        // Eligible 2024-03-31; the day before is too early
        let err = confirm(&w, date("2024-03-30"), GRACE).unwrap_err();
        match err {
            Error::TooEarly { eligible_on } => assert_eq!(eligible_on, date("2024-03-31")),
            other => panic!("expected TooEarly, got {:?}", other),
        }
        // The want itself is untouched
        assert_eq!(w.status, WantStatus::Pending);
    }

    #[test]
    fn test_confirm_on_deadline_approves() {
        let w = want("2024-03-01", 30);
        let approved = confirm(&w, date("2024-03-31"), GRACE).unwrap();
        assert_eq!(approved.status, WantStatus::Approved);
        assert_eq!(approved.decided_on, Some(date("2024-03-31")));
    }

    #[test]
    fn test_confirm_after_deadline_approves() {
        let w = want("2024-03-01", 30);
        let approved = confirm(&w, date("2024-04-05"), GRACE).unwrap();
        assert_eq!(approved.status, WantStatus::Approved);
    }

    #[test]
    fn test_confirm_past_grace_fails() {
        let w = want("2024-03-01", 30);
        // Grace window closes 2024-04-14
        let err = confirm(&w, date("2024-04-15"), GRACE).unwrap_err();
        assert!(matches!(err, Error::WantExpired { .. }));
    }

    #[test]
    fn test_reject_any_time() {
        let w = want("2024-03-01", 30);
        // Well inside the cooling-off period
        let rejected = reject(&w, date("2024-03-02")).unwrap();
        assert_eq!(rejected.status, WantStatus::Rejected);
    }

    #[test]
    fn test_terminal_states_stay_terminal() {
        let w = want("2024-03-01", 30);
        let approved = confirm(&w, date("2024-04-01"), GRACE).unwrap();
        assert!(matches!(
            confirm(&approved, date("2024-04-02"), GRACE),
            Err(Error::WantAlreadyDecided { .. })
        ));
        assert!(matches!(
            reject(&approved, date("2024-04-02")),
            Err(Error::WantAlreadyDecided { .. })
        ));
    }

    #[test]
    fn test_sweep_expires_only_stale_pending() {
        let fresh = want("2024-04-01", 30);
        let stale = Want {
            id: 2,
            ..want("2024-01-01", 30)
        };
        let rejected = Want {
            id: 3,
            status: WantStatus::Rejected,
            decided_on: Some(date("2024-01-05")),
            ..want("2023-12-01", 30)
        };

        // stale's grace closed 2024-02-14
        let expired = sweep_expired(
            &[fresh.clone(), stale.clone(), rejected],
            date("2024-04-10"),
            GRACE,
        );
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, 2);
        assert_eq!(expired[0].status, WantStatus::Expired);
        assert_eq!(expired[0].decided_on, Some(date("2024-04-10")));
    }

    #[test]
    fn test_sweep_boundary() {
        let w = want("2024-03-01", 30);
        // Expires strictly after 2024-04-14
        assert!(sweep_expired(&[w.clone()], date("2024-04-14"), GRACE).is_empty());
        assert_eq!(sweep_expired(&[w], date("2024-04-15"), GRACE).len(), 1);
    }
}
