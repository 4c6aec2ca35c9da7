//! Billing-cycle status classification
//!
//! Decides whether a billing cycle is paid, pending, or overdue. A payment
//! belongs to a cycle when its due date falls in the same month and year as
//! the subscription's next billing date; there is no other link between a
//! transaction and a cycle.
//!
//! All comparisons are calendar dates. The reference date ("today") is an
//! explicit parameter so results are deterministic and testable.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Subscription, Transaction, TransactionStatus};

/// Payment state of a billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingState {
    /// A matching paid transaction exists for this cycle
    Paid,
    /// Not yet due, or due today
    Pending,
    /// Past due without a matching paid transaction
    Overdue,
}

impl fmt::Display for BillingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// Classification of one billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingStatus {
    /// Payment state
    pub state: BillingState,
    /// Whole days past due; zero unless overdue
    pub days_overdue: u32,
}

impl BillingStatus {
    /// Check if this cycle is paid
    pub fn is_paid(&self) -> bool {
        self.state == BillingState::Paid
    }

    /// Check if this cycle is overdue
    pub fn is_overdue(&self) -> bool {
        self.state == BillingState::Overdue
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_overdue() {
            write!(f, "Overdue ({} days)", self.days_overdue)
        } else {
            write!(f, "{}", self.state)
        }
    }
}

/// Check whether a transaction due date belongs to a billing cycle
///
/// True when both dates share the same month and year.
pub fn cycle_matches(due_date: NaiveDate, billing_date: NaiveDate) -> bool {
    due_date.month() == billing_date.month() && due_date.year() == billing_date.year()
}

/// Classify one billing cycle against the given transactions
///
/// `transactions` must already be scoped to the subscription under
/// consideration (see [`classify_subscription`]); only the month/year
/// bucket check is applied here.
///
/// Rules:
/// - paid: any transaction with status `paid` whose due date falls in the
///   cycle's month/year
/// - overdue: the billing date is strictly before `today` and the cycle is
///   not paid; `days_overdue` is the whole-day difference
/// - pending: everything else, including a cycle due exactly today
pub fn classify(
    next_billing_date: NaiveDate,
    today: NaiveDate,
    transactions: &[Transaction],
) -> BillingStatus {
    let has_paid = transactions.iter().any(|t| {
        t.status == TransactionStatus::Paid && cycle_matches(t.due_date, next_billing_date)
    });

    if has_paid {
        return BillingStatus {
            state: BillingState::Paid,
            days_overdue: 0,
        };
    }

    if next_billing_date < today {
        let days = (today - next_billing_date).num_days();
        return BillingStatus {
            state: BillingState::Overdue,
            days_overdue: days as u32,
        };
    }

    BillingStatus {
        state: BillingState::Pending,
        days_overdue: 0,
    }
}

/// Classify a subscription's current cycle against the full ledger
///
/// Filters the ledger down to the subscription's own transactions, then
/// applies [`classify`].
pub fn classify_subscription(
    subscription: &Subscription,
    today: NaiveDate,
    ledger: &[Transaction],
) -> BillingStatus {
    let own: Vec<Transaction> = ledger
        .iter()
        .filter(|t| t.subscription_id == Some(subscription.id))
        .cloned()
        .collect();

    classify(subscription.next_billing_date, today, &own)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ClientId, Money, Recurrence, SubscriptionId, Transaction, TransactionKind,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid_txn(due: NaiveDate) -> Transaction {
        let mut txn = Transaction::new(
            "Billing",
            Money::from_reais(100),
            TransactionKind::Income,
            due,
        );
        txn.mark_paid();
        txn
    }

    fn pending_txn(due: NaiveDate) -> Transaction {
        Transaction::new(
            "Billing",
            Money::from_reais(100),
            TransactionKind::Income,
            due,
        )
    }

    #[test]
    fn test_cycle_matches_same_month_year() {
        assert!(cycle_matches(date(2025, 3, 5), date(2025, 3, 28)));
        assert!(!cycle_matches(date(2025, 4, 5), date(2025, 3, 5)));
        // Same month, different year is a different cycle
        assert!(!cycle_matches(date(2024, 3, 5), date(2025, 3, 5)));
    }

    #[test]
    fn test_due_yesterday_unpaid_is_overdue_one_day() {
        let status = classify(date(2025, 3, 14), date(2025, 3, 15), &[]);
        assert_eq!(status.state, BillingState::Overdue);
        assert_eq!(status.days_overdue, 1);
    }

    #[test]
    fn test_due_today_is_pending() {
        let status = classify(date(2025, 3, 15), date(2025, 3, 15), &[]);
        assert_eq!(status.state, BillingState::Pending);
        assert_eq!(status.days_overdue, 0);
    }

    #[test]
    fn test_paid_in_cycle_month() {
        // Due last month, paid within that same month/year
        let txns = vec![paid_txn(date(2025, 2, 20))];
        let status = classify(date(2025, 2, 10), date(2025, 3, 15), &txns);
        assert_eq!(status.state, BillingState::Paid);
        assert_eq!(status.days_overdue, 0);
    }

    #[test]
    fn test_paid_in_other_month_does_not_count() {
        // Payment recorded in January does not settle the February cycle
        let txns = vec![paid_txn(date(2025, 1, 10))];
        let status = classify(date(2025, 2, 10), date(2025, 3, 15), &txns);
        assert_eq!(status.state, BillingState::Overdue);
    }

    #[test]
    fn test_pending_transaction_does_not_settle() {
        let txns = vec![pending_txn(date(2025, 2, 10))];
        let status = classify(date(2025, 2, 10), date(2025, 3, 15), &txns);
        assert_eq!(status.state, BillingState::Overdue);
        assert_eq!(status.days_overdue, 33);
    }

    #[test]
    fn test_future_cycle_is_pending_regardless_of_history() {
        let txns = vec![paid_txn(date(2025, 2, 10))];
        let status = classify(date(2025, 4, 10), date(2025, 3, 15), &txns);
        assert_eq!(status.state, BillingState::Pending);
        assert_eq!(status.days_overdue, 0);
    }

    #[test]
    fn test_paid_wins_over_overdue() {
        // Late payment recorded in the cycle month settles the cycle even
        // though the due date has passed
        let txns = vec![paid_txn(date(2025, 2, 25))];
        let status = classify(date(2025, 2, 10), date(2025, 3, 1), &txns);
        assert_eq!(status.state, BillingState::Paid);
    }

    #[test]
    fn test_days_overdue_counts_whole_days() {
        let status = classify(date(2025, 1, 1), date(2025, 1, 31), &[]);
        assert_eq!(status.days_overdue, 30);

        let status = classify(date(2024, 12, 15), date(2025, 1, 15), &[]);
        assert_eq!(status.days_overdue, 31);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let txns = vec![paid_txn(date(2025, 2, 20)), pending_txn(date(2025, 3, 10))];
        let first = classify(date(2025, 2, 10), date(2025, 3, 15), &txns);
        let second = classify(date(2025, 2, 10), date(2025, 3, 15), &txns);
        assert_eq!(first, second);
    }

    #[test]
    fn test_classify_subscription_filters_ledger() {
        let client_id = ClientId::new();
        let sub = Subscription::new(
            client_id,
            "Hosting",
            Money::from_reais(99),
            Recurrence::Monthly,
            date(2025, 2, 10),
        );

        // Paid transaction in the right month but for a different subscription
        let mut other = paid_txn(date(2025, 2, 12));
        other.subscription_id = Some(SubscriptionId::new());

        let ledger = vec![other];
        let status = classify_subscription(&sub, date(2025, 3, 1), &ledger);
        assert_eq!(status.state, BillingState::Overdue);

        // The same payment attributed to this subscription settles it
        let mut own = paid_txn(date(2025, 2, 12));
        own.subscription_id = Some(sub.id);

        let ledger = vec![own];
        let status = classify_subscription(&sub, date(2025, 3, 1), &ledger);
        assert_eq!(status.state, BillingState::Paid);
    }

    #[test]
    fn test_display() {
        let overdue = BillingStatus {
            state: BillingState::Overdue,
            days_overdue: 5,
        };
        assert_eq!(format!("{}", overdue), "Overdue (5 days)");

        let pending = BillingStatus {
            state: BillingState::Pending,
            days_overdue: 0,
        };
        assert_eq!(format!("{}", pending), "Pending");
    }
}
