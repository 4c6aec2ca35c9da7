//! Template service
//!
//! Provides business logic for notification template management, including
//! the lookup chain used when composing a message.

use crate::audit::EntityType;
use crate::error::{RetainerError, RetainerResult};
use crate::models::{Channel, NotificationTemplate, TemplateId, Trigger};
use crate::storage::Storage;

/// Service for notification template management
pub struct TemplateService<'a> {
    storage: &'a Storage,
}

/// Fields that can be changed on an existing template
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateInput {
    pub name: Option<String>,
    pub trigger: Option<Trigger>,
    pub subject: Option<Option<String>>,
    pub body: Option<String>,
}

impl<'a> TemplateService<'a> {
    /// Create a new template service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new template
    pub fn create(
        &self,
        name: &str,
        channel: Channel,
        trigger: Trigger,
        subject: Option<String>,
        body: &str,
    ) -> RetainerResult<NotificationTemplate> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RetainerError::Validation(
                "Template name cannot be empty".into(),
            ));
        }

        if self.storage.templates.name_exists(name, None)? {
            return Err(RetainerError::Duplicate {
                entity_type: "Template",
                identifier: name.to_string(),
            });
        }

        let mut template = NotificationTemplate::new(name, channel, trigger, body);
        template.subject = subject.filter(|s| !s.trim().is_empty());

        template
            .validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.templates.upsert(template.clone())?;
        self.storage.templates.save()?;

        self.storage.log_create(
            EntityType::Template,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        Ok(template)
    }

    /// Get a template by ID
    pub fn get(&self, id: TemplateId) -> RetainerResult<Option<NotificationTemplate>> {
        self.storage.templates.get(id)
    }

    /// Find a template by name or ID string
    pub fn find(&self, identifier: &str) -> RetainerResult<Option<NotificationTemplate>> {
        if let Some(template) = self.storage.templates.get_by_name(identifier)? {
            return Ok(Some(template));
        }

        if let Ok(id) = identifier.parse::<TemplateId>() {
            return self.storage.templates.get(id);
        }

        Ok(None)
    }

    /// List templates, optionally for one channel only
    pub fn list(&self, channel: Option<Channel>) -> RetainerResult<Vec<NotificationTemplate>> {
        let templates = self.storage.templates.get_all()?;
        Ok(match channel {
            Some(channel) => templates
                .into_iter()
                .filter(|t| t.channel == channel)
                .collect(),
            None => templates,
        })
    }

    /// Resolve the template to compose with for a channel and trigger
    ///
    /// Falls back to the channel's overdue template when nothing matches
    /// the requested trigger. Returns None when neither exists; the caller
    /// then uses its built-in default message.
    pub fn resolve(
        &self,
        channel: Channel,
        trigger: Trigger,
    ) -> RetainerResult<Option<NotificationTemplate>> {
        if let Some(template) = self.storage.templates.find_active(channel, trigger)? {
            return Ok(Some(template));
        }
        self.storage.templates.find_active(channel, Trigger::Overdue)
    }

    /// Update a template
    pub fn update(
        &self,
        id: TemplateId,
        input: UpdateTemplateInput,
    ) -> RetainerResult<NotificationTemplate> {
        let mut template = self
            .storage
            .templates
            .get(id)?
            .ok_or_else(|| RetainerError::template_not_found(id.to_string()))?;

        let before = template.clone();

        if let Some(new_name) = input.name {
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return Err(RetainerError::Validation(
                    "Template name cannot be empty".into(),
                ));
            }
            if self.storage.templates.name_exists(&new_name, Some(id))? {
                return Err(RetainerError::Duplicate {
                    entity_type: "Template",
                    identifier: new_name,
                });
            }
            template.name = new_name;
        }
        if let Some(trigger) = input.trigger {
            template.trigger = trigger;
        }
        if let Some(subject) = input.subject {
            template.set_subject(subject.filter(|s| !s.trim().is_empty()));
        }
        if let Some(body) = input.body {
            template.set_body(body);
        }
        template.updated_at = chrono::Utc::now();

        template
            .validate()
            .map_err(|e| RetainerError::Validation(e.to_string()))?;

        self.storage.templates.upsert(template.clone())?;
        self.storage.templates.save()?;

        self.storage.log_update(
            EntityType::Template,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;

        Ok(template)
    }

    /// Enable a template
    pub fn enable(&self, id: TemplateId) -> RetainerResult<NotificationTemplate> {
        self.toggle_active(id, true)
    }

    /// Disable a template
    pub fn disable(&self, id: TemplateId) -> RetainerResult<NotificationTemplate> {
        self.toggle_active(id, false)
    }

    fn toggle_active(&self, id: TemplateId, active: bool) -> RetainerResult<NotificationTemplate> {
        let mut template = self
            .storage
            .templates
            .get(id)?
            .ok_or_else(|| RetainerError::template_not_found(id.to_string()))?;

        let before = template.clone();
        if active {
            template.enable();
        } else {
            template.disable();
        }

        self.storage.templates.upsert(template.clone())?;
        self.storage.templates.save()?;

        self.storage.log_update(
            EntityType::Template,
            template.id.to_string(),
            Some(template.name.clone()),
            &before,
            &template,
        )?;

        Ok(template)
    }

    /// Delete a template permanently
    pub fn delete(&self, id: TemplateId) -> RetainerResult<()> {
        let template = self
            .storage
            .templates
            .get(id)?
            .ok_or_else(|| RetainerError::template_not_found(id.to_string()))?;

        self.storage.templates.delete(id)?;
        self.storage.templates.save()?;

        self.storage.log_delete(
            EntityType::Template,
            template.id.to_string(),
            Some(template.name.clone()),
            &template,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::RetainerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_and_find() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create(
                "WhatsApp due",
                Channel::Whatsapp,
                Trigger::Due,
                None,
                "Olá {{cliente}}",
            )
            .unwrap();

        assert!(service.find("whatsapp due").unwrap().is_some());
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create("WhatsApp due", Channel::Whatsapp, Trigger::Due, None, "a")
            .unwrap();
        let result = service.create("whatsapp DUE", Channel::Email, Trigger::Due, None, "b");

        assert!(matches!(result, Err(RetainerError::Duplicate { .. })));
    }

    #[test]
    fn test_resolve_exact_match() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create("WhatsApp due", Channel::Whatsapp, Trigger::Due, None, "due body")
            .unwrap();
        service
            .create(
                "WhatsApp overdue",
                Channel::Whatsapp,
                Trigger::Overdue,
                None,
                "overdue body",
            )
            .unwrap();

        let resolved = service.resolve(Channel::Whatsapp, Trigger::Due).unwrap().unwrap();
        assert_eq!(resolved.body, "due body");
    }

    #[test]
    fn test_resolve_falls_back_to_overdue() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create(
                "WhatsApp overdue",
                Channel::Whatsapp,
                Trigger::Overdue,
                None,
                "overdue body",
            )
            .unwrap();

        // No reminder template exists: the overdue one is used instead
        let resolved = service
            .resolve(Channel::Whatsapp, Trigger::Reminder)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.body, "overdue body");
    }

    #[test]
    fn test_resolve_none_when_channel_empty() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create(
                "WhatsApp overdue",
                Channel::Whatsapp,
                Trigger::Overdue,
                None,
                "overdue body",
            )
            .unwrap();

        assert!(service.resolve(Channel::Email, Trigger::Due).unwrap().is_none());
    }

    #[test]
    fn test_disabled_templates_not_resolved() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        let template = service
            .create("WhatsApp due", Channel::Whatsapp, Trigger::Due, None, "body")
            .unwrap();
        service.disable(template.id).unwrap();

        assert!(service.resolve(Channel::Whatsapp, Trigger::Due).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        let template = service
            .create(
                "E-mail due",
                Channel::Email,
                Trigger::Due,
                Some("Aviso".to_string()),
                "body",
            )
            .unwrap();

        let updated = service
            .update(
                template.id,
                UpdateTemplateInput {
                    body: Some("new body".to_string()),
                    subject: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.body, "new body");
        assert!(updated.subject.is_none());
    }

    #[test]
    fn test_list_by_channel() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        service
            .create("WhatsApp due", Channel::Whatsapp, Trigger::Due, None, "a")
            .unwrap();
        service
            .create("E-mail due", Channel::Email, Trigger::Due, None, "b")
            .unwrap();

        assert_eq!(service.list(None).unwrap().len(), 2);
        assert_eq!(service.list(Some(Channel::Email)).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp, storage) = create_test_storage();
        let service = TemplateService::new(&storage);

        let template = service
            .create("WhatsApp due", Channel::Whatsapp, Trigger::Due, None, "a")
            .unwrap();
        service.delete(template.id).unwrap();

        assert!(service.get(template.id).unwrap().is_none());
    }
}
