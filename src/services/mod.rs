//! Service layer for retainer-cli
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, audit logging, and cross-entity
//! operations.

pub mod client;
pub mod notification;
pub mod subscription;
pub mod template;
pub mod transaction;

pub use client::{ClientService, CreateClientInput, UpdateClientInput};
pub use notification::{
    normalize_phone, render_placeholders, NotificationService, TemplateVars,
};
pub use subscription::{SubscriptionService, SubscriptionSummary, UpdateSubscriptionInput};
pub use template::{TemplateService, UpdateTemplateInput};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
