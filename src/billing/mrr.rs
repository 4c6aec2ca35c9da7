//! Monthly-recurring-revenue normalization
//!
//! Converts a subscription price and cadence into the amount it contributes
//! to one month of revenue: a quarterly R$ 300,00 plan is worth R$ 100,00
//! a month. One-time charges and installment plans are not recurring and
//! contribute nothing.

use crate::models::{Money, Recurrence, Subscription};

/// Normalize a price to its monthly-equivalent contribution
///
/// Zero or negative amounts contribute nothing. Division rounds to the
/// nearest centavo, so exact multiples normalize exactly.
pub fn normalize_to_monthly(amount: Money, recurrence: Recurrence) -> Money {
    if !amount.is_positive() {
        return Money::zero();
    }

    match recurrence.months_in_period() {
        Some(months) => amount.div_round(months as i64),
        None => Money::zero(),
    }
}

/// Sum the monthly-equivalent revenue of the active subscriptions
///
/// Paused subscriptions are skipped. Order of the input is irrelevant.
pub fn monthly_revenue<'a, I>(subscriptions: I) -> Money
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions
        .into_iter()
        .filter(|s| s.is_active)
        .map(|s| normalize_to_monthly(s.amount, s.recurrence))
        .sum()
}
