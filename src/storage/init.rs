//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::RetainerPaths;
use crate::error::RetainerError;
use crate::models::{Channel, NotificationTemplate, Trigger};

use super::file_io::write_json_atomic;
use super::templates::TemplateData;

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and a default notification template set
pub fn initialize_storage(paths: &RetainerPaths) -> Result<(), RetainerError> {
    // Ensure all directories exist
    paths.ensure_directories()?;

    // Seed default templates if templates.json doesn't exist
    if !paths.templates_file().exists() {
        create_default_templates(paths)?;
    }

    Ok(())
}

/// Create the default pt-BR notification templates
///
/// One template per channel for the due and overdue triggers, written in
/// the same register the app falls back to when no template matches.
fn create_default_templates(paths: &RetainerPaths) -> Result<(), RetainerError> {
    let templates = vec![
        NotificationTemplate::new(
            "WhatsApp - vencimento",
            Channel::Whatsapp,
            Trigger::Due,
            "Olá {{cliente}}! O serviço *{{servico}}* vence em {{vencimento}}. \
             Valor: {{valor}}. Pague em {{link_pagamento}}",
        ),
        NotificationTemplate::new(
            "WhatsApp - atraso",
            Channel::Whatsapp,
            Trigger::Overdue,
            "Olá {{cliente}}, o serviço *{{servico}}* venceu em {{vencimento}} e \
             consta em aberto. Valor: {{valor}}. Pague em {{link_pagamento}}",
        ),
        NotificationTemplate::with_subject(
            "E-mail - vencimento",
            Channel::Email,
            Trigger::Due,
            "Aviso de vencimento - {{servico}}",
            "Olá {{cliente}},\n\nO serviço {{servico}} vence em {{vencimento}}.\n\
             Valor: {{valor}}\n\nLink de pagamento: {{link_pagamento}}",
        ),
        NotificationTemplate::with_subject(
            "E-mail - atraso",
            Channel::Email,
            Trigger::Overdue,
            "Fatura em atraso - {{servico}}",
            "Olá {{cliente}},\n\nO serviço {{servico}} venceu em {{vencimento}} e \
             ainda consta em aberto.\nValor: {{valor}}\n\n\
             Link de pagamento: {{link_pagamento}}",
        ),
    ];

    let data = TemplateData { templates };
    write_json_atomic(paths.templates_file(), &data)?;

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &RetainerPaths) -> bool {
    !paths.templates_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));

        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.templates_file().exists());
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_default_templates_created() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.templates_file()).unwrap();
        let data: TemplateData = serde_json::from_str(&content).unwrap();

        // One template per channel for due and overdue
        assert_eq!(data.templates.len(), 4);
        assert!(data
            .templates
            .iter()
            .any(|t| t.matches(Channel::Whatsapp, Trigger::Overdue)));
        assert!(data
            .templates
            .iter()
            .any(|t| t.matches(Channel::Email, Trigger::Due)));

        // E-mail templates carry subjects, WhatsApp ones don't
        for t in &data.templates {
            match t.channel {
                Channel::Email => assert!(t.subject.is_some()),
                Channel::Whatsapp => assert!(t.subject.is_none()),
            }
        }
    }

    #[test]
    fn test_initialize_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths).unwrap();

        // Wipe the seeded templates and re-run: the file must be kept as-is
        let empty = TemplateData { templates: vec![] };
        write_json_atomic(paths.templates_file(), &empty).unwrap();

        initialize_storage(&paths).unwrap();

        let content = std::fs::read_to_string(paths.templates_file()).unwrap();
        let data: TemplateData = serde_json::from_str(&content).unwrap();
        assert!(data.templates.is_empty());
    }
}
