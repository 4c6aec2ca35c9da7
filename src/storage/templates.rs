//! Template repository for JSON storage
//!
//! Manages loading and saving notification templates to templates.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::RetainerError;
use crate::models::{Channel, NotificationTemplate, TemplateId, Trigger};

use super::file_io::{read_json, write_json_atomic};

/// Serializable template data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TemplateData {
    pub templates: Vec<NotificationTemplate>,
}

/// Repository for notification template persistence
pub struct TemplateRepository {
    path: PathBuf,
    data: RwLock<HashMap<TemplateId, NotificationTemplate>>,
}

impl TemplateRepository {
    /// Create a new template repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load templates from disk
    pub fn load(&self) -> Result<(), RetainerError> {
        let file_data: TemplateData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for template in file_data.templates {
            data.insert(template.id, template);
        }

        Ok(())
    }

    /// Save templates to disk
    pub fn save(&self) -> Result<(), RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut templates: Vec<_> = data.values().cloned().collect();
        templates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let file_data = TemplateData { templates };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a template by ID
    pub fn get(&self, id: TemplateId) -> Result<Option<NotificationTemplate>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all templates, sorted by name
    pub fn get_all(&self) -> Result<Vec<NotificationTemplate>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut templates: Vec<_> = data.values().cloned().collect();
        templates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(templates)
    }

    /// Get a template by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<NotificationTemplate>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let lowered = name.to_lowercase();
        Ok(data
            .values()
            .find(|t| t.name.to_lowercase() == lowered)
            .cloned())
    }

    /// Find the active template for a channel and trigger
    pub fn find_active(
        &self,
        channel: Channel,
        trigger: Trigger,
    ) -> Result<Option<NotificationTemplate>, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .values()
            .find(|t| t.is_active && t.matches(channel, trigger))
            .cloned())
    }

    /// Check if a template name already exists (case-insensitive)
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<TemplateId>,
    ) -> Result<bool, RetainerError> {
        let data = self
            .data
            .read()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let lowered = name.to_lowercase();
        Ok(data
            .values()
            .any(|t| t.name.to_lowercase() == lowered && Some(t.id) != exclude_id))
    }

    /// Insert or update a template
    pub fn upsert(&self, template: NotificationTemplate) -> Result<(), RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(template.id, template);
        Ok(())
    }

    /// Delete a template
    pub fn delete(&self, id: TemplateId) -> Result<bool, RetainerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| RetainerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count templates
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
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TemplateRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("templates.json");
        let repo = TemplateRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_find_active_by_channel_and_trigger() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(NotificationTemplate::new(
            "WhatsApp overdue",
            Channel::Whatsapp,
            Trigger::Overdue,
            "Olá {{cliente}}",
        ))
        .unwrap();

        let mut disabled = NotificationTemplate::new(
            "E-mail due (disabled)",
            Channel::Email,
            Trigger::Due,
            "Olá {{cliente}}",
        );
        disabled.disable();
        repo.upsert(disabled).unwrap();

        assert!(repo
            .find_active(Channel::Whatsapp, Trigger::Overdue)
            .unwrap()
            .is_some());
        // Disabled templates are never selected
        assert!(repo
            .find_active(Channel::Email, Trigger::Due)
            .unwrap()
            .is_none());
        assert!(repo
            .find_active(Channel::Whatsapp, Trigger::Receipt)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let template = NotificationTemplate::new(
            "WhatsApp due",
            Channel::Whatsapp,
            Trigger::Due,
            "Olá {{cliente}}",
        );
        let id = template.id;
        repo.upsert(template).unwrap();
        repo.save().unwrap();

        let path = temp_dir.path().join("templates.json");
        let repo2 = TemplateRepository::new(path);
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "WhatsApp due");
    }

    #[test]
    fn test_get_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(NotificationTemplate::new(
            "WhatsApp due",
            Channel::Whatsapp,
            Trigger::Due,
            "corpo",
        ))
        .unwrap();

        assert!(repo.get_by_name("whatsapp due").unwrap().is_some());
        assert!(repo.get_by_name("missing").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let template =
            NotificationTemplate::new("WhatsApp due", Channel::Whatsapp, Trigger::Due, "corpo");
        let id = template.id;
        repo.upsert(template).unwrap();

        assert!(repo.delete(id).unwrap());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
