//! Outbox repository for JSON storage
//!
//! Holds composed notifications waiting for the external dispatcher.
//! Append-mostly: messages are queued here and drained out-of-process.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RetainerError;
use crate::models::{MessageId, OutboundMessage};

use super::file_io::{read_json, write_json_atomic};

/// Serializable outbox data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct OutboxData {
    messages: Vec<OutboundMessage>,
}

/// Repository for queued outbound messages
pub struct OutboxRepository {
    path: PathBuf,
    data: RwLock<HashMap<MessageId, OutboundMessage>>,
}

impl OutboxRepository {
    /// Create a new outbox repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load queued messages from disk
    pub fn load(&self) -> Result<(), RetainerError> {
        let file_data: OutboxData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for msg in file_data.messages {
            data.insert(msg.id, msg);
        }

        Ok(())
    }

    /// Save queued messages to disk
    pub fn save(&self) -> Result<(), RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut messages: Vec<_> = data.values().cloned().collect();
        messages.sort_by(|a, b| a.queued_at.cmp(&b.queued_at));

        let file_data = OutboxData { messages };
        write_json_atomic(&self.path, &file_data)
    }

    /// Queue a message
    pub fn enqueue(&self, message: OutboundMessage) -> Result<(), RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(message.id, message);
        Ok(())
    }

    /// Get all queued messages, oldest first
    pub fn get_all(&self) -> Result<Vec<OutboundMessage>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut messages: Vec<_> = data.values().cloned().collect();
        messages.sort_by(|a, b| a.queued_at.cmp(&b.queued_at));
        Ok(messages)
    }

    /// Get the most recent N queued messages
    pub fn get_recent(&self, count: usize) -> Result<Vec<OutboundMessage>, RetainerError> {
        let all = self.get_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all[start..].to_vec())
    }

    /// Count queued messages
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
    use crate::models::{Channel, Trigger};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, OutboxRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("outbox.json");
        let repo = OutboxRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_enqueue_and_get_all() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.enqueue(OutboundMessage::new(
            Channel::Whatsapp,
            Trigger::Due,
            "5511987654321",
            "corpo",
        ))
        .unwrap();
        repo.enqueue(OutboundMessage::new(
            Channel::Email,
            Trigger::Overdue,
            "billing@acme.com",
            "corpo",
        ))
        .unwrap();

        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let msg = OutboundMessage::new(Channel::Whatsapp, Trigger::Due, "5511987654321", "corpo");
        let id = msg.id;
        repo.enqueue(msg).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("outbox.json");
        let repo2 = OutboxRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get_all().unwrap()[0].id, id);
    }

    #[test]
    fn test_get_recent() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        for i in 0..5 {
            repo.enqueue(OutboundMessage::new(
                Channel::Whatsapp,
                Trigger::Due,
                format!("551198765432{}", i),
                "corpo",
            ))
            .unwrap();
        }

        assert_eq!(repo.get_recent(2).unwrap().len(), 2);
        assert_eq!(repo.get_recent(10).unwrap().len(), 5);
    }
}
