//! Billing CLI commands
//!
//! The collections worklist and manual notification triggers.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::report::format_collections;
use crate::display::template::format_message_preview;
use crate::error::{RetainerError, RetainerResult};
use crate::reports::CollectionsReport;
use crate::services::{NotificationService, SubscriptionService};
use crate::storage::Storage;

use super::resolve_today;
use super::template::parse_channel;

/// Billing subcommands
#[derive(Subcommand)]
pub enum BillingCommands {
    /// Show the collections worklist
    #[command(alias = "list")]
    Status {
        /// Include cycles due in future months
        #[arg(short, long)]
        all: bool,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Compose and queue a notification for a subscription
    Notify {
        /// Subscription name or ID
        subscription: String,
        /// Delivery channel (whatsapp, email)
        #[arg(short, long)]
        channel: String,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Compose a notification without queueing it
    Preview {
        /// Subscription name or ID
        subscription: String,
        /// Delivery channel (whatsapp, email)
        #[arg(short, long)]
        channel: String,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show messages queued for the external dispatcher
    Outbox {
        /// Number of messages to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a billing command
pub fn handle_billing_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillingCommands,
) -> RetainerResult<()> {
    match cmd {
        BillingCommands::Status { all, date } => {
            let today = resolve_today(date.as_deref())?;
            let report = CollectionsReport::generate(storage, today, all)?;
            print!("{}", format_collections(&report));
        }

        BillingCommands::Notify {
            subscription,
            channel,
            date,
        } => {
            let sub = SubscriptionService::new(storage)
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;
            let channel = parse_channel(&channel)?;
            let today = resolve_today(date.as_deref())?;

            let service = NotificationService::new(storage, settings);
            let message = service.send_manual(sub.id, channel, today)?;

            println!("Queued {} notification for '{}':", message.channel, sub.name);
            println!();
            print!("{}", format_message_preview(&message));
        }

        BillingCommands::Preview {
            subscription,
            channel,
            date,
        } => {
            let sub = SubscriptionService::new(storage)
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;
            let channel = parse_channel(&channel)?;
            let today = resolve_today(date.as_deref())?;

            let service = NotificationService::new(storage, settings);
            let message = service.compose(sub.id, channel, today)?;

            print!("{}", format_message_preview(&message));
        }

        BillingCommands::Outbox { limit } => {
            let messages = storage.outbox.get_recent(limit)?;

            if messages.is_empty() {
                println!("Outbox is empty.");
                return Ok(());
            }

            for message in &messages {
                println!(
                    "{} {} -> {} ({})",
                    message.queued_at.format("%Y-%m-%d %H:%M"),
                    message.channel,
                    message.recipient,
                    message.trigger
                );
            }
            println!("\n{} message(s) queued", messages.len());
        }
    }

    Ok(())
}
