//! Transaction CLI commands
//!
//! Implements CLI commands for the ledger.

use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::{RetainerError, RetainerResult};
use crate::models::{TransactionKind, TransactionStatus};
use crate::services::{
    ClientService, CreateTransactionInput, SubscriptionService, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, resolve_today};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a ledger entry
    Add {
        /// What the entry is for
        description: String,
        /// Amount (e.g., "299,90")
        amount: String,
        /// Entry kind (income, expense)
        #[arg(short, long, default_value = "income")]
        kind: String,
        /// Client name or ID
        #[arg(short, long)]
        client: Option<String>,
        /// Subscription name or ID
        #[arg(short, long)]
        subscription: Option<String>,
        /// Due date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        due: Option<String>,
        /// Record as already paid
        #[arg(long)]
        paid: bool,
    },
    /// Generate the pending billing entry for a subscription's current cycle
    Charge {
        /// Subscription name or ID
        subscription: String,
    },
    /// List ledger entries
    List {
        /// Filter by client name or ID
        #[arg(short, long)]
        client: Option<String>,
        /// Filter by subscription name or ID
        #[arg(short, long)]
        subscription: Option<String>,
        /// Filter by kind (income, expense)
        #[arg(short, long)]
        kind: Option<String>,
        /// Filter by status (pending, paid)
        #[arg(long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show ledger entry details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Mark a ledger entry as paid
    Pay {
        /// Transaction ID
        id: String,
        /// Also roll the linked subscription's billing date forward
        #[arg(short, long)]
        advance: bool,
    },
    /// Mark a ledger entry back as pending
    Unpay {
        /// Transaction ID
        id: String,
    },
    /// Delete a ledger entry
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_kind(s: &str) -> RetainerResult<TransactionKind> {
    TransactionKind::parse(s).ok_or_else(|| {
        RetainerError::Validation(format!(
            "Invalid kind: '{}'. Valid values: income, expense",
            s
        ))
    })
}

fn parse_status(s: &str) -> RetainerResult<TransactionStatus> {
    TransactionStatus::parse(s).ok_or_else(|| {
        RetainerError::Validation(format!(
            "Invalid status: '{}'. Valid values: pending, paid",
            s
        ))
    })
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> RetainerResult<()> {
    let service = TransactionService::new(storage);
    let client_service = ClientService::new(storage);
    let subscription_service = SubscriptionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            description,
            amount,
            kind,
            client,
            subscription,
            due,
            paid,
        } => {
            let amount = parse_amount(&amount)?;
            let kind = parse_kind(&kind)?;
            let due_date = resolve_today(due.as_deref())?;

            let client_id = match &client {
                Some(identifier) => Some(
                    client_service
                        .find(identifier)?
                        .ok_or_else(|| RetainerError::client_not_found(identifier))?
                        .id,
                ),
                None => None,
            };
            let subscription_id = match &subscription {
                Some(identifier) => Some(
                    subscription_service
                        .find(identifier)?
                        .ok_or_else(|| RetainerError::subscription_not_found(identifier))?
                        .id,
                ),
                None => None,
            };

            let status = if paid {
                Some(TransactionStatus::Paid)
            } else {
                None
            };

            let txn = service.create(CreateTransactionInput {
                client_id,
                subscription_id,
                description,
                amount,
                kind,
                status,
                due_date,
            })?;

            println!("Created transaction:");
            println!("  ID:     {}", txn.id);
            println!("  Due:    {}", txn.due_date);
            println!("  Amount: {}", txn.amount);
            println!("  Kind:   {}", txn.kind);
            println!("  Status: {}", txn.status);
        }

        TransactionCommands::Charge { subscription } => {
            let sub = subscription_service
                .find(&subscription)?
                .ok_or_else(|| RetainerError::subscription_not_found(&subscription))?;

            let txn = service.charge_subscription(sub.id)?;

            println!("Billed '{}' for its current cycle:", sub.name);
            println!("  ID:     {}", txn.id);
            println!("  Due:    {}", txn.due_date);
            println!("  Amount: {}", txn.amount);
        }

        TransactionCommands::List {
            client,
            subscription,
            kind,
            status,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(identifier) = &client {
                let found = client_service
                    .find(identifier)?
                    .ok_or_else(|| RetainerError::client_not_found(identifier))?;
                filter = filter.client(found.id);
            }
            if let Some(identifier) = &subscription {
                let found = subscription_service
                    .find(identifier)?
                    .ok_or_else(|| RetainerError::subscription_not_found(identifier))?;
                filter = filter.subscription(found.id);
            }
            if let Some(kind) = &kind {
                filter = filter.kind(parse_kind(kind)?);
            }
            if let Some(status) = &status {
                filter = filter.status(parse_status(status)?);
            }
            if let Some(from) = &from {
                filter.start_date = Some(parse_date(from)?);
            }
            if let Some(to) = &to {
                filter.end_date = Some(parse_date(to)?);
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| RetainerError::transaction_not_found(&id))?;

            let client_name = match txn.client_id {
                Some(client_id) => client_service.get(client_id)?.map(|c| c.name),
                None => None,
            };
            let subscription_name = match txn.subscription_id {
                Some(sub_id) => subscription_service.get(sub_id)?.map(|s| s.name),
                None => None,
            };

            print!(
                "{}",
                format_transaction_details(
                    &txn,
                    client_name.as_deref(),
                    subscription_name.as_deref()
                )
            );
        }

        TransactionCommands::Pay { id, advance } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| RetainerError::transaction_not_found(&id))?;

            let paid = service.pay(txn.id, advance)?;
            println!("Marked as paid: {}", paid.description);
            if advance {
                if let Some(sub_id) = paid.subscription_id {
                    if let Some(sub) = subscription_service.get(sub_id)? {
                        println!("Next billing date for '{}': {}", sub.name, sub.next_billing_date);
                    }
                }
            }
        }

        TransactionCommands::Unpay { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| RetainerError::transaction_not_found(&id))?;

            let reverted = service.unpay(txn.id)?;
            println!("Marked as pending: {}", reverted.description);
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| RetainerError::transaction_not_found(&id))?;

            if !force {
                println!(
                    "This permanently deletes '{}' and cannot be undone. Re-run with --force to confirm.",
                    txn.description
                );
                return Ok(());
            }

            service.delete(txn.id)?;
            println!("Deleted transaction: {}", txn.description);
        }
    }

    Ok(())
}
