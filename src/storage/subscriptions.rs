//! Subscription repository for JSON storage
//!
//! Manages loading and saving subscriptions to subscriptions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RetainerError;
use crate::models::{ClientId, Subscription, SubscriptionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable subscription data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SubscriptionData {
    subscriptions: Vec<Subscription>,
}

/// Repository for subscription persistence with indexing
pub struct SubscriptionRepository {
    path: PathBuf,
    data: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Index: client_id -> subscription_ids
    by_client: RwLock<HashMap<ClientId, Vec<SubscriptionId>>>,
}

impl SubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_client: RwLock::new(HashMap::new()),
        }
    }

    /// Load subscriptions from disk and build the client index
    pub fn load(&self) -> Result<(), RetainerError> {
        let file_data: SubscriptionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_client.clear();

        for sub in file_data.subscriptions {
            by_client.entry(sub.client_id).or_default().push(sub.id);
            data.insert(sub.id, sub);
        }

        Ok(())
    }

    /// Save subscriptions to disk
    pub fn save(&self) -> Result<(), RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut subscriptions: Vec<_> = data.values().cloned().collect();
        subscriptions.sort_by(|a, b| {
            a.next_billing_date
                .cmp(&b.next_billing_date)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        let file_data = SubscriptionData { subscriptions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a subscription by ID
    pub fn get(&self, id: SubscriptionId) -> Result<Option<Subscription>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all subscriptions, sorted by next billing date
    pub fn get_all(&self) -> Result<Vec<Subscription>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut subscriptions: Vec<_> = data.values().cloned().collect();
        subscriptions.sort_by(|a, b| a.next_billing_date.cmp(&b.next_billing_date));
        Ok(subscriptions)
    }

    /// Get all active subscriptions, sorted by next billing date
    pub fn get_active(&self) -> Result<Vec<Subscription>, RetainerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|s| s.is_active)
            .collect())
    }

    /// Get subscriptions for a client
    pub fn get_by_client(&self, client_id: ClientId) -> Result<Vec<Subscription>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_client = self
            .by_client
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_client
            .get(&client_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut subscriptions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        subscriptions.sort_by(|a, b| a.next_billing_date.cmp(&b.next_billing_date));
        Ok(subscriptions)
    }

    /// Get the first subscription with this name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Subscription>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let lowered = name.to_lowercase();
        Ok(data
            .values()
            .find(|s| s.name.to_lowercase() == lowered)
            .cloned())
    }

    /// Insert or update a subscription
    pub fn upsert(&self, sub: Subscription) -> Result<(), RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old index if the client changed
        if let Some(old) = data.get(&sub.id) {
            if old.client_id != sub.client_id {
                if let Some(ids) = by_client.get_mut(&old.client_id) {
                    ids.retain(|&id| id != sub.id);
                }
            }
        }

        let ids = by_client.entry(sub.client_id).or_default();
        if !ids.contains(&sub.id) {
            ids.push(sub.id);
        }

        data.insert(sub.id, sub);
        Ok(())
    }

    /// Delete a subscription
    pub fn delete(&self, id: SubscriptionId) -> Result<bool, RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(sub) = data.remove(&id) {
            if let Some(ids) = by_client.get_mut(&sub.client_id) {
                ids.retain(|&sid| sid != id);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count subscriptions
    pub fn count(&self) -> Result<usize, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Recurrence};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SubscriptionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("subscriptions.json");
        let repo = SubscriptionRepository::new(path);
        (temp_dir, repo)
    }

    fn test_sub(client_id: ClientId, name: &str) -> Subscription {
        Subscription::new(
            client_id,
            name,
            Money::from_reais(99),
            Recurrence::Monthly,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let sub = test_sub(ClientId::new(), "Hosting");
        let id = sub.id;
        repo.upsert(sub).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Hosting");
    }

    #[test]
    fn test_get_by_client() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let client1 = ClientId::new();
        let client2 = ClientId::new();

        repo.upsert(test_sub(client1, "Hosting")).unwrap();
        repo.upsert(test_sub(client1, "Maintenance")).unwrap();
        repo.upsert(test_sub(client2, "SEO")).unwrap();

        assert_eq!(repo.get_by_client(client1).unwrap().len(), 2);
        assert_eq!(repo.get_by_client(client2).unwrap().len(), 1);
    }

    #[test]
    fn test_get_active() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let client_id = ClientId::new();
        let mut paused = test_sub(client_id, "Paused service");
        paused.pause();

        repo.upsert(test_sub(client_id, "Hosting")).unwrap();
        repo.upsert(paused).unwrap();

        assert_eq!(repo.get_all().unwrap().len(), 2);
        assert_eq!(repo.get_active().unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let sub = test_sub(ClientId::new(), "Hosting");
        let id = sub.id;
        repo.upsert(sub).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("subscriptions.json");
        let repo2 = SubscriptionRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "Hosting");
    }

    #[test]
    fn test_delete_updates_index() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let client_id = ClientId::new();
        let sub = test_sub(client_id, "Hosting");
        let id = sub.id;
        repo.upsert(sub).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get_by_client(client_id).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_same_id_does_not_duplicate_index() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let client_id = ClientId::new();
        let mut sub = test_sub(client_id, "Hosting");
        repo.upsert(sub.clone()).unwrap();

        sub.set_amount(Money::from_reais(129));
        repo.upsert(sub).unwrap();

        assert_eq!(repo.get_by_client(client_id).unwrap().len(), 1);
    }
}
