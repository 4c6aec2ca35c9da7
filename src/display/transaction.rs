//! Transaction display formatting
//!
//! Register views and status indicators for ledger entries.

use crate::models::{Transaction, TransactionStatus};

use super::truncate;

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let status_icon = match txn.status {
        TransactionStatus::Pending => " ",
        TransactionStatus::Paid => "✓",
    };

    let direction = if txn.is_income() { "+" } else { "-" };

    format!(
        "{} {} {:24} {:8} {}{}",
        status_icon,
        txn.due_date.format("%Y-%m-%d"),
        truncate(&txn.description, 24),
        txn.kind.to_string(),
        direction,
        txn.amount
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:2} {:10} {:24} {:8} {:>14}\n",
        "St", "Due", "Description", "Kind", "Amount"
    ));
    output.push_str(&"-".repeat(64));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(
    txn: &Transaction,
    client_name: Option<&str>,
    subscription_name: Option<&str>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction:  {}\n", txn.id));
    output.push_str(&format!("Description:  {}\n", txn.description));
    output.push_str(&format!("Due:          {}\n", txn.due_date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:       {}\n", txn.amount));
    output.push_str(&format!("Kind:         {}\n", txn.kind));
    output.push_str(&format!("Status:       {}\n", txn.status));

    if let Some(name) = client_name {
        output.push_str(&format!("Client:       {}\n", name));
    }
    if let Some(name) = subscription_name {
        output.push_str(&format!("Subscription: {}\n", name));
    }

    output
}
