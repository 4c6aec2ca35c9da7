//! Subscription CLI commands
//!
//! Implements CLI commands for subscription management.

use clap::Subcommand;

use crate::display::subscription::{format_subscription_details, format_subscription_list};
use crate::error::{RetainerError, RetainerResult};
use crate::models::Recurrence;
use crate::services::{ClientService, SubscriptionService, UpdateSubscriptionInput};
use crate::storage::Storage;

use super::{parse_amount, parse_date, resolve_today};

/// Subscription subcommands
#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Create a new subscription
    Create {
        /// Client name or ID
        client: String,
        /// Service name
        name: String,
        /// Price per billing period (e.g., "299,90")
        amount: String,
        /// Billing cadence (monthly, quarterly, semiannual, annual, one_time, installment)
        #[arg(short, long, default_value = "monthly")]
        recurrence: String,
        /// First billing date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List subscriptions
    List {
        /// Include paused subscriptions
        #[arg(short, long)]
        all: bool,
    },
    /// Show subscription details
    Show {
        /// Subscription name or ID
        subscription: String,
    },
    /// Edit a subscription
    Edit {
        /// Subscription name or ID
        subscription: String,
        /// New service name
        #[arg(long)]
        name: Option<String>,
        /// New price
        #[arg(short, long)]
        amount: Option<String>,
        /// New billing cadence
        #[arg(short, long)]
        recurrence: Option<String>,
        /// New next billing date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Pause billing for a subscription
    Pause {
        /// Subscription name or ID
        subscription: String,
    },
    /// Resume billing for a subscription
    Resume {
        /// Subscription name or ID
        subscription: String,
    },
    /// Roll the billing date forward one period
    Advance {
        /// Subscription name or ID
        subscription: String,
    },
    /// Delete a subscription permanently
    Delete {
        /// Subscription name or ID
        subscription: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_recurrence(s: &str) -> RetainerResult<Recurrence> {
    Recurrence::parse(s).ok_or_else(|| {
        RetainerError::Validation(format!(
            "Invalid recurrence: '{}'. Valid values: monthly, quarterly, semiannual, annual, one_time, installment",
            s
        ))
    })
}

/// Handle a subscription command
pub fn handle_subscription_command(
    storage: &Storage,
    cmd: SubscriptionCommands,
) -> RetainerResult<()> {
    let service = SubscriptionService::new(storage);
    let client_service = ClientService::new(storage);

    match cmd {
        SubscriptionCommands::Create {
            client,
            name,
            amount,
            recurrence,
            due,
        } => {
            let client = client_service
                .find(&client)?
                .ok_or_else(|| RetainerError::client_not_found(&client))?;

            let amount = parse_amount(&amount)?;
            let recurrence = parse_recurrence(&recurrence)?;
            let next_billing_date = resolve_today(due.as_deref())?;

            let sub = service.create(client.id, &name, amount, recurrence, next_billing_date)?;

            println!("Created subscription: {}", sub.name);
            println!("  ID:         {}", sub.id);
            println!("  Client:     {}", client.name);
            println!("  Amount:     {}", sub.amount);
            println!("  Recurrence: {}", sub.recurrence);
            println!("  Next due:   {}", sub.next_billing_date);
        }

        SubscriptionCommands::List { all } => {
            let summaries = service.list_with_clients(all)?;
            print!("{}", format_subscription_list(&summaries));
        }

        SubscriptionCommands::Show { subscription } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;

            let client_name = client_service
                .get(found.client_id)?
                .map(|c| c.name)
                .unwrap_or_else(|| "(unknown client)".to_string());

            print!("{}", format_subscription_details(&found, &client_name));
        }

        SubscriptionCommands::Edit {
            subscription,
            name,
            amount,
            recurrence,
            due,
            notes,
        } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;

            if name.is_none()
                && amount.is_none()
                && recurrence.is_none()
                && due.is_none()
                && notes.is_none()
            {
                println!("No changes specified. Use --name, --amount, --recurrence, --due or --notes.");
                return Ok(());
            }

            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let recurrence = recurrence.as_deref().map(parse_recurrence).transpose()?;
            let next_billing_date = due.as_deref().map(parse_date).transpose()?;

            let updated = service.update(
                found.id,
                UpdateSubscriptionInput {
                    name,
                    amount,
                    recurrence,
                    next_billing_date,
                    notes,
                },
            )?;
            println!("Updated subscription: {}", updated.name);
        }

        SubscriptionCommands::Pause { subscription } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;
            let paused = service.pause(found.id)?;
            println!("Paused subscription: {}", paused.name);
        }

        SubscriptionCommands::Resume { subscription } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;
            let resumed = service.resume(found.id)?;
            println!("Resumed subscription: {}", resumed.name);
        }

        SubscriptionCommands::Advance { subscription } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;
            let advanced = service.advance(found.id)?;
            println!(
                "Advanced '{}' to {}",
                advanced.name, advanced.next_billing_date
            );
        }

        SubscriptionCommands::Delete {
            subscription,
            force,
        } => {
            let found = service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;

            if !force {
                println!(
                    "This permanently deletes '{}' and cannot be undone. Re-run with --force to confirm.",
                    found.name
                );
                return Ok(());
            }

            service.delete(found.id)?;
            println!("Deleted subscription: {}", found.name);
        }
    }

    Ok(())
}
