//! Currency helpers
//!
//! All currency arithmetic in sift uses `rust_decimal::Decimal` so repeated
//! operations (the debt simulator runs up to 600 iterations) never accumulate
//! float drift. Rounding is round-half-up to the cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to the smallest currency unit, half-up
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal as a dollar amount
pub fn format_usd(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}
