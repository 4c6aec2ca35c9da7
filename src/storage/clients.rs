//! Client repository for JSON storage
//!
//! Manages loading and saving clients to clients.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RetainerError;
use crate::models::{Client, ClientId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable client data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ClientData {
    clients: Vec<Client>,
}

/// Repository for client persistence
pub struct ClientRepository {
    path: PathBuf,
    data: RwLock<HashMap<ClientId, Client>>,
}

impl ClientRepository {
    /// Create a new client repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load clients from disk
    pub fn load(&self) -> Result<(), RetainerError> {
        let file_data: ClientData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for client in file_data.clients {
            data.insert(client.id, client);
        }

        Ok(())
    }

    /// Save clients to disk
    pub fn save(&self) -> Result<(), RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut clients: Vec<_> = data.values().cloned().collect();
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let file_data = ClientData { clients };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> Result<Option<Client>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all clients, sorted by name
    pub fn get_all(&self) -> Result<Vec<Client>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut clients: Vec<_> = data.values().cloned().collect();
        clients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(clients)
    }

    /// Get all non-archived clients, sorted by name
    pub fn get_active(&self) -> Result<Vec<Client>, RetainerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| !c.archived)
            .collect())
    }

    /// Get a client by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Client>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let lowered = name.to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == lowered)
            .cloned())
    }

    /// Check if a client name already exists (case-insensitive)
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<ClientId>,
    ) -> Result<bool, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let lowered = name.to_lowercase();
        Ok(data
            .values()
            .any(|c| c.name.to_lowercase() == lowered && Some(c.id) != exclude_id))
    }

    /// Insert or update a client
    pub fn upsert(&self, client: Client) -> Result<(), RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(client.id, client);
        Ok(())
    }

    /// Delete a client
    pub fn delete(&self, id: ClientId) -> Result<bool, RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count clients
    pub fn count(&self) -> Result<usize, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
