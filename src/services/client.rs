//! Client service
//!
//! Provides business logic for client management: CRUD operations,
//! archiving, and validation.

use crate::audit::EntityType;
use crate::error::{RetainerError, RetainerResult};
use crate::models::{Client, ClientId};
use crate::storage::Storage;

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new client
#[derive(Debug, Clone, Default)]
pub struct CreateClientInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Fields that can be changed on an existing client
///
/// `None` leaves a field untouched; `Some` replaces it.
#[derive(Debug, Clone, Default)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub contact_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub notes: Option<String>,
}

impl<'a> ClientService<'a> {
    /// Create a new client service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new client
    pub fn create(&self, input: CreateClientInput) -> RetainerResult<Client> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(RetainerError::Validation(
                "Client name cannot be empty".into(),
            ));
        }

        // Check for duplicate name
        if self.storage.clients.name_exists(name, None)? {
            return Err(RetainerError::Duplicate {
                entity_type: "Client",
                identifier: name.to_string(),
            });
        }

        let mut client = Client::new(name);
        client.contact_name = input.contact_name.filter(|s| !s.trim().is_empty());
        client.email = input.email.filter(|s| !s.trim().is_empty());
        client.phone = input.phone.filter(|s| !s.trim().is_empty());
        if let Some(notes) = input.notes {
            client.notes = notes;
        }

        client
            .validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_create(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &client,
        )?;

        Ok(client)
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> RetainerResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by name or ID string
    pub fn find(&self, identifier: &str) -> RetainerResult<Option<Client>> {
        // Try by name first
        if let Some(client) = self.storage.clients.get_by_name(identifier)? {
            return Ok(Some(client));
        }

        // Try parsing as ID
        if let Ok(id) = identifier.parse::<ClientId>() {
            return self.storage.clients.get(id);
        }

        Ok(None)
    }

    /// Get all clients
    pub fn list(&self, include_archived: bool) -> RetainerResult<Vec<Client>> {
        if include_archived {
            self.storage.clients.get_all()
        } else {
            self.storage.clients.get_active()
        }
    }

    /// Search clients by name substring (case-insensitive)
    pub fn search(&self, term: &str) -> RetainerResult<Vec<Client>> {
        let lowered = term.to_lowercase();
        Ok(self
            .storage
            .clients
            .get_active()?
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&lowered)
                    || c.contact_name
                        .as_ref()
                        .is_some_and(|n| n.to_lowercase().contains(&lowered))
            })
            .collect())
    }

    /// Update a client
    pub fn update(&self, id: ClientId, input: UpdateClientInput) -> RetainerResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| RetainerError::client_not_found(id.to_string()))?;

        let before = client.clone();

        if let Some(new_name) = input.name {
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return Err(RetainerError::Validation(
                    "Client name cannot be empty".into(),
                ));
            }
            if self.storage.clients.name_exists(&new_name, Some(id))? {
                return Err(RetainerError::Duplicate {
                    entity_type: "Client",
                    identifier: new_name,
                });
            }
            client.set_name(new_name);
        }

        if let Some(contact_name) = input.contact_name {
            client.set_contact_name(contact_name.filter(|s| !s.trim().is_empty()));
        }
        if let Some(email) = input.email {
            client.set_email(email.filter(|s| !s.trim().is_empty()));
        }
        if let Some(phone) = input.phone {
            client.set_phone(phone.filter(|s| !s.trim().is_empty()));
        }
        if let Some(notes) = input.notes {
            client.set_notes(notes);
        }

        client
            .validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_update(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &before,
            &client,
        )?;

        Ok(client)
    }

    /// Archive a client
    pub fn archive(&self, id: ClientId) -> RetainerResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| RetainerError::client_not_found(id.to_string()))?;

        let before = client.clone();
        client.archive();

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_update(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &before,
            &client,
        )?;

        Ok(client)
    }

    /// Unarchive a client
    pub fn unarchive(&self, id: ClientId) -> RetainerResult<Client> {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| RetainerError::client_not_found(id.to_string()))?;

        let before = client.clone();
        client.unarchive();

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.log_update(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &before,
            &client,
        )?;

        Ok(client)
    }

    /// Delete a client permanently
    ///
    /// Refused while subscriptions still reference the client; archive
    /// instead, or delete the subscriptions first.
    pub fn delete(&self, id: ClientId) -> RetainerResult<()> {
        let client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| RetainerError::client_not_found(id.to_string()))?;

        let subscriptions = self.storage.subscriptions.get_by_client(id)?;
        if !subscriptions.is_empty() {
            return Err(RetainerError::Validation(format!(
                "Client '{}' still has {} subscription(s); delete them first or archive the client",
                client.name,
                subscriptions.len()
            )));
        }

        self.storage.clients.delete(id)?;
        self.storage.clients.save()?;

        self.storage.log_delete(
            EntityType::Client,
            client.id.to_string(),
            Some(client.name.clone()),
            &client,
        )?;

        Ok(())
    }
}
