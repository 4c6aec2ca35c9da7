//! Subscription display formatting

use crate::models::Subscription;
use crate::services::SubscriptionSummary;

use super::truncate;

/// Format a list of subscriptions (with client names) as a table
pub fn format_subscription_list(summaries: &[SubscriptionSummary]) -> String {
    if summaries.is_empty() {
        return "No subscriptions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:20} {:20} {:>12} {:12} {:10}\n",
        "ID", "Client", "Service", "Amount", "Recurrence", "Next due"
    ));
    output.push_str(&"-".repeat(92));
    output.push('\n');

    for summary in summaries {
        let sub = &summary.subscription;
        let paused_marker = if sub.is_active { "" } else { " (paused)" };
        output.push_str(&format!(
            "{:12} {:20} {:20} {:>12} {:12} {:10}{}\n",
            sub.id.to_string(),
            truncate(&summary.client_name, 20),
            truncate(&sub.name, 20),
            sub.amount.to_string(),
            sub.recurrence.to_string(),
            sub.next_billing_date.format("%Y-%m-%d"),
            paused_marker
        ));
    }

    output.push_str(&format!("\n{} subscription(s)\n", summaries.len()));
    output
}

/// Format subscription details for display
pub fn format_subscription_details(sub: &Subscription, client_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Subscription: {}\n", sub.id));
    output.push_str(&format!("Service:      {}\n", sub.name));
    output.push_str(&format!("Client:       {}\n", client_name));
    output.push_str(&format!("Amount:       {}\n", sub.amount));
    output.push_str(&format!("Recurrence:   {}\n", sub.recurrence));
    output.push_str(&format!(
        "Next due:     {}\n",
        sub.next_billing_date.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "Status:       {}\n",
        if sub.is_active { "Active" } else { "Paused" }
    ));
    if !sub.notes.is_empty() {
        output.push_str(&format!("Notes:        {}\n", sub.notes));
    }

    output
}
