//! JSON Export functionality
//!
//! Exports the complete database to JSON format with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{RetainerError, RetainerResult};
use crate::models::{Client, NotificationTemplate, Subscription, Transaction};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// All clients
    pub clients: Vec<Client>,

    /// All subscriptions
    pub subscriptions: Vec<Subscription>,

    /// All transactions
    pub transactions: Vec<Transaction>,

    /// All notification templates
    pub templates: Vec<NotificationTemplate>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Total number of clients
    pub client_count: usize,

    /// Total number of subscriptions
    pub subscription_count: usize,

    /// Total number of transactions
    pub transaction_count: usize,

    /// Total number of templates
    pub template_count: usize,

    /// Date range of transactions (earliest due date)
    pub earliest_due_date: Option<String>,

    /// Date range of transactions (latest due date)
    pub latest_due_date: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> RetainerResult<Self> {
        let clients = storage.clients.get_all()?;
        let subscriptions = storage.subscriptions.get_all()?;
        let transactions = storage.transactions.get_all()?;
        let templates = storage.templates.get_all()?;

        let earliest_due_date = transactions
            .iter()
            .map(|t| t.due_date)
            .min()
            .map(|d| d.to_string());

        let latest_due_date = transactions
            .iter()
            .map(|t| t.due_date)
            .max()
            .map(|d| d.to_string());

        let metadata = ExportMetadata {
            client_count: clients.len(),
            subscription_count: subscriptions.len(),
            transaction_count: transactions.len(),
            template_count: templates.len(),
            earliest_due_date,
            latest_due_date,
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            clients,
            subscriptions,
            transactions,
            templates,
            metadata,
        })
    }

    /// Write the export as pretty-printed JSON
    pub fn write<W: Write>(&self, writer: W) -> RetainerResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| RetainerError::Export(e.to_string()))
    }
}
