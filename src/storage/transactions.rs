//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::RetainerError;
use crate::models::{ClientId, SubscriptionId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: client_id -> transaction_ids
    by_client: RwLock<HashMap<ClientId, Vec<TransactionId>>>,
    /// Index: subscription_id -> transaction_ids
    by_subscription: RwLock<HashMap<SubscriptionId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_client: RwLock::new(HashMap::new()),
            by_subscription: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build indexes
    pub fn load(&self) -> Result<(), RetainerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_subscription = self
            .by_subscription
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_client.clear();
        by_subscription.clear();

        for txn in file_data.transactions {
            let id = txn.id;

            if let Some(client_id) = txn.client_id {
                by_client.entry(client_id).or_default().push(id);
            }
            if let Some(sub_id) = txn.subscription_id {
                by_subscription.entry(sub_id).or_default().push(id);
            }

            data.insert(id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.due_date
                .cmp(&a.due_date)
                .then(b.created_at.cmp(&a.created_at))
        });

        let file_data = TransactionData { transactions };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, most recent due date first
    pub fn get_all(&self) -> Result<Vec<Transaction>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| {
            b.due_date
                .cmp(&a.due_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(transactions)
    }

    /// Get transactions for a client
    pub fn get_by_client(&self, client_id: ClientId) -> Result<Vec<Transaction>, RetainerError> {
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
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(transactions)
    }

    /// Get transactions for a subscription
    pub fn get_by_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Vec<Transaction>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_subscription = self
            .by_subscription
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_subscription
            .get(&subscription_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.due_date.cmp(&a.due_date));
        Ok(transactions)
    }

    /// Get transactions due in a date range (inclusive)
    pub fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, RetainerError> {
        let all = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|t| t.due_date >= start && t.due_date <= end)
            .collect())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_subscription = self
            .by_subscription
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        // Remove from old indexes if updating
        if let Some(old) = data.get(&txn.id) {
            if let Some(client_id) = old.client_id {
                if let Some(ids) = by_client.get_mut(&client_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
            if let Some(sub_id) = old.subscription_id {
                if let Some(ids) = by_subscription.get_mut(&sub_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        // Add to new indexes
        if let Some(client_id) = txn.client_id {
            by_client.entry(client_id).or_default().push(txn.id);
        }
        if let Some(sub_id) = txn.subscription_id {
            by_subscription.entry(sub_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_client = self
            .by_client
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_subscription = self
            .by_subscription
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(txn) = data.remove(&id) {
            if let Some(client_id) = txn.client_id {
                if let Some(ids) = by_client.get_mut(&client_id) {
                    ids.retain(|&tid| tid != id);
                }
            }
            if let Some(sub_id) = txn.subscription_id {
                if let Some(ids) = by_subscription.get_mut(&sub_id) {
                    ids.retain(|&tid| tid != id);
                }
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Count transactions
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
    use crate::models::{Money, TransactionKind};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
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

        let txn = Transaction::new(
            "Hosting",
            Money::from_reais(99),
            TransactionKind::Income,
            date(2025, 1, 10),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();

        let retrieved = repo.get(id).unwrap().unwrap();
        assert_eq!(retrieved.amount.cents(), 9900);
    }

    #[test]
    fn test_get_by_subscription() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let sub1 = SubscriptionId::new();
        let sub2 = SubscriptionId::new();
        let client = ClientId::new();

        repo.upsert(Transaction::for_subscription(
            sub1,
            client,
            "Hosting",
            Money::from_reais(99),
            date(2025, 1, 10),
        ))
        .unwrap();
        repo.upsert(Transaction::for_subscription(
            sub1,
            client,
            "Hosting",
            Money::from_reais(99),
            date(2025, 2, 10),
        ))
        .unwrap();
        repo.upsert(Transaction::for_subscription(
            sub2,
            client,
            "SEO",
            Money::from_reais(300),
            date(2025, 1, 15),
        ))
        .unwrap();

        assert_eq!(repo.get_by_subscription(sub1).unwrap().len(), 2);
        assert_eq!(repo.get_by_subscription(sub2).unwrap().len(), 1);
        assert_eq!(repo.get_by_client(client).unwrap().len(), 3);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let txn = Transaction::new(
            "Office rent",
            Money::from_reais(1200),
            TransactionKind::Expense,
            date(2025, 1, 5),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("transactions.json");
        let repo2 = TransactionRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let retrieved = repo2.get(id).unwrap().unwrap();
        assert_eq!(retrieved.description, "Office rent");
    }

    #[test]
    fn test_date_range_query() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        for (day, amount) in [(10, 100), (15, 200), (20, 300)] {
            repo.upsert(Transaction::new(
                "Billing",
                Money::from_reais(amount),
                TransactionKind::Income,
                date(2025, 1, day),
            ))
            .unwrap();
        }

        let range = repo
            .get_by_date_range(date(2025, 1, 12), date(2025, 1, 18))
            .unwrap();

        assert_eq!(range.len(), 1);
        assert_eq!(range[0].amount.cents(), 20000);
    }

    #[test]
    fn test_delete_updates_indexes() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let sub_id = SubscriptionId::new();
        let client_id = ClientId::new();
        let txn = Transaction::for_subscription(
            sub_id,
            client_id,
            "Hosting",
            Money::from_reais(99),
            date(2025, 1, 10),
        );
        let id = txn.id;
        repo.upsert(txn).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get_by_subscription(sub_id).unwrap().is_empty());
        assert!(repo.get_by_client(client_id).unwrap().is_empty());
    }
}
