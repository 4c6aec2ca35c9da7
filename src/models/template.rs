//! Notification template model
//!
//! Per-channel, per-trigger message templates with placeholder substitution.
//! Bodies may contain `{{cliente}}`, `{{servico}}`, `{{valor}}`,
//! `{{vencimento}}` and `{{link_pagamento}}`, filled in at composition time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TemplateId;

/// Delivery channel for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// WhatsApp message via webhook
    Whatsapp,
    /// E-mail via SMTP
    Email,
}

impl Channel {
    /// Parse a channel from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wpp" => Some(Self::Whatsapp),
            "email" | "e-mail" | "mail" => Some(Self::Email),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whatsapp => write!(f, "WhatsApp"),
            Self::Email => write!(f, "E-mail"),
        }
    }
}

/// The billing situation a template is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Upcoming due date reminder
    Reminder,
    /// Due today or this cycle
    Due,
    /// Past due without payment
    Overdue,
    /// Payment received confirmation
    Receipt,
}

impl Trigger {
    /// Parse a trigger from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reminder" => Some(Self::Reminder),
            "due" => Some(Self::Due),
            "overdue" => Some(Self::Overdue),
            "receipt" => Some(Self::Receipt),
            _ => None,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reminder => write!(f, "Reminder"),
            Self::Due => write!(f, "Due"),
            Self::Overdue => write!(f, "Overdue"),
            Self::Receipt => write!(f, "Receipt"),
        }
    }
}

/// A notification message template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    /// Unique identifier
    pub id: TemplateId,

    /// Template name (e.g., "Overdue nudge - short")
    pub name: String,

    /// Delivery channel this template is written for
    pub channel: Channel,

    /// Billing situation this template is written for
    pub trigger: Trigger,

    /// Subject line (e-mail only; WhatsApp messages have no subject)
    pub subject: Option<String>,

    /// Message body with placeholders
    pub body: String,

    /// Inactive templates are never selected for composition
    pub is_active: bool,

    /// When the template was created
    pub created_at: DateTime<Utc>,

    /// When the template was last modified
    pub updated_at: DateTime<Utc>,
}

impl NotificationTemplate {
    /// Create a new active template
    pub fn new(
        name: impl Into<String>,
        channel: Channel,
        trigger: Trigger,
        body: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::new(),
            name: name.into(),
            channel,
            trigger,
            subject: None,
            body: body.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new active template with a subject line
    pub fn with_subject(
        name: impl Into<String>,
        channel: Channel,
        trigger: Trigger,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut template = Self::new(name, channel, trigger, body);
        template.subject = Some(subject.into());
        template
    }

    /// Check whether this template serves the given channel and trigger
    pub fn matches(&self, channel: Channel, trigger: Trigger) -> bool {
        self.channel == channel && self.trigger == trigger
    }

    /// Set the body
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.updated_at = Utc::now();
    }

    /// Set the subject line
    pub fn set_subject(&mut self, subject: Option<String>) {
        self.subject = subject;
        self.updated_at = Utc::now();
    }

    /// Enable this template
    pub fn enable(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Disable this template
    pub fn disable(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.name.trim().is_empty() {
            return Err(TemplateValidationError::EmptyName);
        }
        if self.body.trim().is_empty() {
            return Err(TemplateValidationError::EmptyBody);
        }
        Ok(())
    }
}

/// Validation errors for templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    EmptyName,
    EmptyBody,
}

impl fmt::Display for TemplateValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Template name cannot be empty"),
            Self::EmptyBody => write!(f, "Template body cannot be empty"),
        }
    }
}

impl std::error::Error for TemplateValidationError {}
