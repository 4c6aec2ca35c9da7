//! Collections Report
//!
//! The billing worklist: every active subscription's current cycle with its
//! payment status, for chasing invoices. The default visibility policy
//! mirrors how collections are actually worked: cycles due in a future
//! month are hidden, and cycles from past months disappear once paid.

use chrono::{Datelike, NaiveDate};

use crate::billing::{self, BillingState, BillingStatus};
use crate::error::RetainerResult;
use crate::models::{Money, SubscriptionId};
use crate::storage::Storage;

/// One worklist row
#[derive(Debug, Clone)]
pub struct CollectionsRow {
    pub subscription_id: SubscriptionId,
    pub client_name: String,
    pub subscription_name: String,
    pub amount: Money,
    pub next_billing_date: NaiveDate,
    pub status: BillingStatus,
}

/// Collections worklist
#[derive(Debug, Clone)]
pub struct CollectionsReport {
    /// Worklist rows, soonest due date first
    pub rows: Vec<CollectionsRow>,
    /// Rows settled for their cycle
    pub paid_count: usize,
    /// Rows not yet due
    pub pending_count: usize,
    /// Rows past due
    pub overdue_count: usize,
    /// Total amount across overdue rows
    pub overdue_total: Money,
    /// The reference date the report was generated against
    pub as_of: NaiveDate,
}

impl CollectionsReport {
    /// Generate the collections worklist
    ///
    /// With `show_all`, the visibility policy is skipped and every active
    /// subscription appears regardless of its cycle's month.
    pub fn generate(storage: &Storage, today: NaiveDate, show_all: bool) -> RetainerResult<Self> {
        let start_of_current_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("first of current month is always valid");
        let start_of_next_month = billing_month_after(start_of_current_month);

        let mut rows = Vec::new();

        for sub in storage.subscriptions.get_active()? {
            let ledger = storage.transactions.get_by_subscription(sub.id)?;
            let status = billing::classify(sub.next_billing_date, today, &ledger);

            if !show_all {
                // Future cycles aren't worked yet
                if sub.next_billing_date >= start_of_next_month {
                    continue;
                }
                // Settled past-month cycles are done
                if sub.next_billing_date < start_of_current_month && status.is_paid() {
                    continue;
                }
            }

            let client_name = storage
                .clients
                .get(sub.client_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "(unknown client)".to_string());

            rows.push(CollectionsRow {
                subscription_id: sub.id,
                client_name,
                subscription_name: sub.name,
                amount: sub.amount,
                next_billing_date: sub.next_billing_date,
                status,
            });
        }

        rows.sort_by(|a, b| {
            a.next_billing_date
                .cmp(&b.next_billing_date)
                .then_with(|| a.client_name.to_lowercase().cmp(&b.client_name.to_lowercase()))
        });

        let paid_count = rows
            .iter()
            .filter(|r| r.status.state == BillingState::Paid)
            .count();
        let pending_count = rows
            .iter()
            .filter(|r| r.status.state == BillingState::Pending)
            .count();
        let overdue_count = rows
            .iter()
            .filter(|r| r.status.state == BillingState::Overdue)
            .count();
        let overdue_total = rows
            .iter()
            .filter(|r| r.status.state == BillingState::Overdue)
            .map(|r| r.amount)
            .sum();

        Ok(Self {
            rows,
            paid_count,
            pending_count,
            overdue_count,
            overdue_total,
            as_of: today,
        })
    }
}

/// First day of the month after the given first-of-month date
fn billing_month_after(first_of_month: NaiveDate) -> NaiveDate {
    crate::models::add_months(first_of_month, 1)
}
