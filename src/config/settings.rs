//! User settings for retainer-cli
//!
//! Manages user preferences (date format, country dial code, payment link)
//! and the delivery settings handed to the external notification dispatcher.

use serde::{Deserialize, Serialize};

use super::paths::RetainerPaths;
use crate::error::RetainerError;

/// Delivery settings recorded for the external notification dispatcher
///
/// retainer itself never opens an SMTP connection or calls a webhook; it
/// composes messages into the local outbox. These values are stored so the
/// dispatcher that drains the outbox knows where to deliver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeliverySettings {
    /// SMTP server hostname
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP server port (465 implies SSL, anything else STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username (also used as the sender address when it is an address)
    #[serde(default)]
    pub smtp_user: String,

    /// SMTP password
    #[serde(default)]
    pub smtp_pass: String,

    /// Webhook URL for WhatsApp message delivery
    #[serde(default)]
    pub whatsapp_webhook_url: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// User settings for retainer-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Country dial code prefixed to national phone numbers for WhatsApp
    #[serde(default = "default_country_dial_code")]
    pub country_dial_code: String,

    /// Payment link substituted for the {{link_pagamento}} placeholder
    #[serde(default)]
    pub payment_link: Option<String>,

    /// Delivery settings for the external dispatcher
    #[serde(default)]
    pub delivery: DeliverySettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    // Brazilian day-first convention, matching how due dates render in
    // composed messages.
    "%d/%m/%Y".to_string()
}

fn default_country_dial_code() -> String {
    "55".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: default_date_format(),
            country_dial_code: default_country_dial_code(),
            payment_link: None,
            delivery: DeliverySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &RetainerPaths) -> Result<Self, RetainerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| RetainerError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| RetainerError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Create default settings
            let settings = Settings::default();
            // Don't save yet - let caller decide when to persist
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RetainerPaths) -> Result<(), RetainerError> {
        // Ensure the config directory exists
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| RetainerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| RetainerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.date_format, "%d/%m/%Y");
        assert_eq!(settings.country_dial_code, "55");
        assert_eq!(settings.delivery.smtp_port, 587);
        assert!(settings.payment_link.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.payment_link = Some("https://pay.example.com/abc".to_string());
        settings.delivery.smtp_host = "smtp.example.com".to_string();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(
            loaded.payment_link.as_deref(),
            Some("https://pay.example.com/abc")
        );
        assert_eq!(loaded.delivery.smtp_host, "smtp.example.com");
    }

    #[test]
    fn test_serde_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.country_dial_code, deserialized.country_dial_code);
    }
}
