//! CSV Export functionality
//!
//! Exports transactions and clients to CSV format.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{RetainerError, RetainerResult};
use crate::storage::Storage;

/// Export all transactions to CSV
pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> RetainerResult<()> {
    // Build lookups
    let clients = storage.clients.get_all()?;
    let client_names: HashMap<_, _> = clients.iter().map(|c| (c.id, c.name.clone())).collect();

    let subscriptions = storage.subscriptions.get_all()?;
    let subscription_names: HashMap<_, _> = subscriptions
        .iter()
        .map(|s| (s.id, s.name.clone()))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "ID",
        "Due Date",
        "Client",
        "Subscription",
        "Description",
        "Kind",
        "Status",
        "Amount",
    ])
    .map_err(|e| RetainerError::Export(e.to_string()))?;

    for txn in storage.transactions.get_all()? {
        let client_name = txn
            .client_id
            .and_then(|id| client_names.get(&id).cloned())
            .unwrap_or_default();
        let subscription_name = txn
            .subscription_id
            .and_then(|id| subscription_names.get(&id).cloned())
            .unwrap_or_default();

        wtr.write_record([
            txn.id.to_string(),
            txn.due_date.to_string(),
            client_name,
            subscription_name,
            txn.description.clone(),
            txn.kind.to_string(),
            txn.status.to_string(),
            format!("{:.2}", txn.amount.cents() as f64 / 100.0),
        ])
        .map_err(|e| RetainerError::Export(e.to_string()))?;
    }

    wtr.flush()
        .map_err(|e| RetainerError::Export(e.to_string()))?;

    Ok(())
}

/// Export all clients to CSV
pub fn export_clients_csv<W: Write>(storage: &Storage, writer: W) -> RetainerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["ID", "Name", "Contact", "E-mail", "Phone", "Archived", "Notes"])
        .map_err(|e| RetainerError::Export(e.to_string()))?;

    for client in storage.clients.get_all()? {
        wtr.write_record([
            client.id.to_string(),
            client.name.clone(),
            client.contact_name.clone().unwrap_or_default(),
            client.email.clone().unwrap_or_default(),
            client.phone.clone().unwrap_or_default(),
            client.archived.to_string(),
            client.notes.clone(),
        ])
        .map_err(|e| RetainerError::Export(e.to_string()))?;
    }

    wtr.flush()
        .map_err(|e| RetainerError::Export(e.to_string()))?;

    Ok(())
}
