//! Core data models for retainer-cli

pub mod client;
pub mod ids;
pub mod message;
pub mod money;
pub mod subscription;
pub mod template;
pub mod transaction;

pub use client::{Client, ClientValidationError};
pub use ids::{ClientId, MessageId, SubscriptionId, TemplateId, TransactionId};
pub use message::OutboundMessage;
pub use money::{Money, MoneyParseError};
pub use subscription::{add_months, Recurrence, Subscription, SubscriptionValidationError};
pub use template::{Channel, NotificationTemplate, TemplateValidationError, Trigger};
pub use transaction::{
    Transaction, TransactionKind, TransactionStatus, TransactionValidationError,
};
