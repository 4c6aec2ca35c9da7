//! Dashboard Report
//!
//! The at-a-glance business summary: client count, active subscriptions,
//! normalized monthly recurring revenue, ledger totals, and recent activity.

use crate::billing;
use crate::error::RetainerResult;
use crate::models::{Money, Transaction};
use crate::storage::Storage;

/// How many ledger entries the dashboard shows as recent activity
const RECENT_ACTIVITY_LIMIT: usize = 5;

/// A recent ledger entry joined with its client's name
#[derive(Debug, Clone)]
pub struct RecentActivity {
    pub transaction: Transaction,
    pub client_name: Option<String>,
}

/// Dashboard summary
#[derive(Debug, Clone)]
pub struct DashboardReport {
    /// Number of non-archived clients
    pub client_count: usize,
    /// Number of active subscriptions
    pub active_subscription_count: usize,
    /// Normalized monthly recurring revenue across active subscriptions
    pub monthly_recurring_revenue: Money,
    /// Sum of all income entries
    pub income_total: Money,
    /// Sum of all expense entries
    pub expense_total: Money,
    /// Income minus expenses
    pub balance: Money,
    /// Most recent ledger entries
    pub recent_transactions: Vec<RecentActivity>,
}

impl DashboardReport {
    /// Generate a dashboard report
    pub fn generate(storage: &Storage) -> RetainerResult<Self> {
        let client_count = storage.clients.get_active()?.len();

        let active_subscriptions = storage.subscriptions.get_active()?;
        let active_subscription_count = active_subscriptions.len();
        let monthly_recurring_revenue = billing::monthly_revenue(&active_subscriptions);

        let transactions = storage.transactions.get_all()?;

        let income_total: Money = transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let expense_total: Money = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();

        let mut recent_transactions = Vec::with_capacity(RECENT_ACTIVITY_LIMIT);
        for transaction in transactions.into_iter().take(RECENT_ACTIVITY_LIMIT) {
            let client_name = match transaction.client_id {
                Some(client_id) => storage.clients.get(client_id)?.map(|c| c.name),
                None => None,
            };
            recent_transactions.push(RecentActivity {
                transaction,
                client_name,
            });
        }

        Ok(Self {
            client_count,
            active_subscription_count,
            monthly_recurring_revenue,
            income_total,
            expense_total,
            balance: income_total - expense_total,
            recent_transactions,
        })
    }
}
