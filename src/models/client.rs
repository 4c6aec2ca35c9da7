//! Client model
//!
//! Represents a billed client: the business or person a subscription is
//! invoiced to, with the contact details notifications are addressed to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClientId;

/// A billed client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: ClientId,

    /// Client name (business or person, e.g., "Acme Studio")
    pub name: String,

    /// Contact person, preferred over `name` in message greetings
    pub contact_name: Option<String>,

    /// E-mail address for e-mail notifications
    pub email: Option<String>,

    /// Phone number for WhatsApp notifications (stored as entered)
    pub phone: Option<String>,

    /// Notes about this client
    #[serde(default)]
    pub notes: String,

    /// Whether this client is archived (soft-deleted)
    #[serde(default)]
    pub archived: bool,

    /// When the client was created
    pub created_at: DateTime<Utc>,

    /// When the client was last modified
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a new client
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            contact_name: None,
            email: None,
            phone: None,
            notes: String::new(),
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The name used when greeting this client in a message
    ///
    /// Contact person when set, otherwise the client name.
    pub fn display_name(&self) -> &str {
        self.contact_name.as_deref().unwrap_or(&self.name)
    }

    /// Set the client name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Set the contact person
    pub fn set_contact_name(&mut self, contact_name: Option<String>) {
        self.contact_name = contact_name;
        self.updated_at = Utc::now();
    }

    /// Set the e-mail address
    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Set the phone number
    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
        self.updated_at = Utc::now();
    }

    /// Set notes
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.updated_at = Utc::now();
    }

    /// Archive this client
    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    /// Unarchive this client
    pub fn unarchive(&mut self) {
        self.archived = false;
        self.updated_at = Utc::now();
    }

    /// Validate the client
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ClientValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid e-mail address: {}", email),
        }
    }
}

impl std::error::Error for ClientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = Client::new("Acme Studio");
        assert_eq!(client.name, "Acme Studio");
        assert!(client.contact_name.is_none());
        assert!(!client.archived);
    }

    #[test]
    fn test_display_name_prefers_contact() {
        let mut client = Client::new("Acme Studio");
        assert_eq!(client.display_name(), "Acme Studio");

        client.set_contact_name(Some("Maria Silva".to_string()));
        assert_eq!(client.display_name(), "Maria Silva");
    }

    #[test]
    fn test_archive_unarchive() {
        let mut client = Client::new("Acme Studio");

        client.archive();
        assert!(client.archived);

        client.unarchive();
        assert!(!client.archived);
    }

    #[test]
    fn test_validation_empty_name() {
        let mut client = Client::new("Acme Studio");
        client.name = "   ".to_string();

        assert_eq!(client.validate(), Err(ClientValidationError::EmptyName));
    }

    #[test]
    fn test_validation_bad_email() {
        let mut client = Client::new("Acme Studio");
        client.set_email(Some("not-an-address".to_string()));

        assert!(matches!(
            client.validate(),
            Err(ClientValidationError::InvalidEmail(_))
        ));

        client.set_email(Some("billing@acme.com".to_string()));
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let mut client = Client::new("Acme Studio");
        client.set_email(Some("billing@acme.com".to_string()));
        client.set_phone(Some("(11) 98765-4321".to_string()));

        let json = serde_json::to_string(&client).unwrap();
        let deserialized: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(client.id, deserialized.id);
        assert_eq!(client.email, deserialized.email);
        assert_eq!(client.phone, deserialized.phone);
    }
}
