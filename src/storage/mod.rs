//! Storage layer for retainer-cli
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation, plus the audit hooks the service layer records mutations with.

pub mod clients;
pub mod file_io;
pub mod init;
pub mod outbox;
pub mod subscriptions;
pub mod templates;
pub mod transactions;

pub use clients::ClientRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use outbox::OutboxRepository;
pub use subscriptions::SubscriptionRepository;
pub use templates::TemplateRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::RetainerPaths;
use crate::error::{RetainerError, RetainerResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: RetainerPaths,
    audit: AuditLogger,
    pub clients: ClientRepository,
    pub subscriptions: SubscriptionRepository,
    pub transactions: TransactionRepository,
    pub templates: TemplateRepository,
    pub outbox: OutboxRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: RetainerPaths) -> Result<Self, RetainerError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            clients: ClientRepository::new(paths.clients_file()),
            subscriptions: SubscriptionRepository::new(paths.subscriptions_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            templates: TemplateRepository::new(paths.templates_file()),
            outbox: OutboxRepository::new(paths.outbox_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &RetainerPaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), RetainerError> {
        self.clients.load()?;
        self.subscriptions.load()?;
        self.transactions.load()?;
        self.templates.load()?;
        self.outbox.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), RetainerError> {
        self.clients.save()?;
        self.subscriptions.save()?;
        self.transactions.save()?;
        self.templates.save()?;
        self.outbox.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    /// Record a create operation in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> RetainerResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update operation in the audit log, with a field diff
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> RetainerResult<()> {
        let diff = match (
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
        ) {
            (Some(b), Some(a)) => generate_diff(&b, &a),
            _ => None,
        };

        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete operation in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> RetainerResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
