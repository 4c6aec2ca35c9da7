//! Report display formatting
//!
//! Renders the dashboard summary and the collections worklist for the
//! terminal.

use crate::billing::BillingState;
use crate::reports::{CollectionsReport, DashboardReport};

use super::truncate;

/// Format the dashboard report
pub fn format_dashboard(report: &DashboardReport) -> String {
    let mut output = String::new();

    output.push_str("Business Summary\n");
    output.push_str(&"=".repeat(40));
    output.push('\n');
    output.push_str(&format!("Clients:              {}\n", report.client_count));
    output.push_str(&format!(
        "Active subscriptions: {}\n",
        report.active_subscription_count
    ));
    output.push_str(&format!(
        "Monthly revenue (MRR): {}\n",
        report.monthly_recurring_revenue
    ));
    output.push('\n');
    output.push_str(&format!("Income:   {}\n", report.income_total));
    output.push_str(&format!("Expenses: {}\n", report.expense_total));
    output.push_str(&format!("Balance:  {}\n", report.balance));

    if !report.recent_transactions.is_empty() {
        output.push_str("\nRecent activity\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for activity in &report.recent_transactions {
            let txn = &activity.transaction;
            let who = activity
                .client_name
                .as_deref()
                .unwrap_or(&txn.description);
            output.push_str(&format!(
                "{} {:24} {:>14} {}\n",
                txn.due_date.format("%Y-%m-%d"),
                truncate(who, 24),
                txn.signed_amount().to_string(),
                txn.status
            ));
        }
    }

    output
}

/// Format the collections worklist
pub fn format_collections(report: &CollectionsReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Collections as of {}\n",
        report.as_of.format("%Y-%m-%d")
    ));
    output.push_str(&"=".repeat(88));
    output.push('\n');

    if report.rows.is_empty() {
        output.push_str("Nothing to collect.\n");
        return output;
    }

    output.push_str(&format!(
        "{:12} {:20} {:20} {:>12} {:10} {}\n",
        "ID", "Client", "Service", "Amount", "Due", "Status"
    ));
    output.push_str(&"-".repeat(88));
    output.push('\n');

    for row in &report.rows {
        let status_icon = match row.status.state {
            BillingState::Paid => "✓",
            BillingState::Pending => "·",
            BillingState::Overdue => "!",
        };
        output.push_str(&format!(
            "{:12} {:20} {:20} {:>12} {:10} {} {}\n",
            row.subscription_id.to_string(),
            truncate(&row.client_name, 20),
            truncate(&row.subscription_name, 20),
            row.amount.to_string(),
            row.next_billing_date.format("%Y-%m-%d"),
            status_icon,
            row.status
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "{} paid, {} pending, {} overdue (overdue total: {})\n",
        report.paid_count, report.pending_count, report.overdue_count, report.overdue_total
    ));

    output
}
