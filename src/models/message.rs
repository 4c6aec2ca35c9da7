//! Outbound message model
//!
//! A fully composed notification queued in the local outbox. Delivery
//! (SMTP connection, webhook call) is the job of an external dispatcher
//! that drains the outbox; retainer only composes and records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClientId, MessageId, SubscriptionId};
use super::template::{Channel, Trigger};

/// A composed notification waiting for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Unique identifier
    pub id: MessageId,

    /// Delivery channel
    pub channel: Channel,

    /// Billing situation that produced this message
    pub trigger: Trigger,

    /// Delivery address: normalized phone number or e-mail address
    pub recipient: String,

    /// Subject line (e-mail only)
    pub subject: Option<String>,

    /// Rendered message body
    pub body: String,

    /// Client the message is addressed to
    pub client_id: Option<ClientId>,

    /// Subscription the message is about
    pub subscription_id: Option<SubscriptionId>,

    /// When the message was queued
    pub queued_at: DateTime<Utc>,
}

impl OutboundMessage {
    /// Create a new queued message
    pub fn new(
        channel: Channel,
        trigger: Trigger,
        recipient: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            channel,
            trigger,
            recipient: recipient.into(),
            subject: None,
            body: body.into(),
            client_id: None,
            subscription_id: None,
            queued_at: Utc::now(),
        }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {} ({})", self.channel, self.recipient, self.trigger)
    }
}
