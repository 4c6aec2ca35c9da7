//! Path management for retainer-cli
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `RETAINER_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/retainer-cli` or `~/.config/retainer-cli`
//! 3. Windows: `%APPDATA%\retainer-cli`

use std::path::PathBuf;

use crate::error::RetainerError;

/// Manages all paths used by retainer-cli
#[derive(Debug, Clone)]
pub struct RetainerPaths {
    /// Base directory for all retainer data
    base_dir: PathBuf,
}

impl RetainerPaths {
    /// Create a new RetainerPaths instance
    ///
    /// Path resolution:
    /// 1. `RETAINER_CLI_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/retainer-cli` or `~/.config/retainer-cli`
    /// 3. Windows: `%APPDATA%\retainer-cli`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, RetainerError> {
        let base_dir = if let Ok(custom) = std::env::var("RETAINER_CLI_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create RetainerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/retainer-cli/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config directory (same as base for simplicity)
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    /// Get the data directory (~/.config/retainer-cli/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to clients.json
    pub fn clients_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    /// Get the path to subscriptions.json
    pub fn subscriptions_file(&self) -> PathBuf {
        self.data_dir().join("subscriptions.json")
    }

    /// Get the path to transactions.json
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to templates.json
    pub fn templates_file(&self) -> PathBuf {
        self.data_dir().join("templates.json")
    }

    /// Get the path to outbox.json (queued notifications)
    pub fn outbox_file(&self) -> PathBuf {
        self.data_dir().join("outbox.json")
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/retainer-cli/)
    /// - Data directory (~/.config/retainer-cli/data/)
    pub fn ensure_directories(&self) -> Result<(), RetainerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| RetainerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| RetainerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if retainer has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, RetainerError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("retainer-cli"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, RetainerError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| RetainerError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("retainer-cli"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RetainerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.clients_file(),
            temp_dir.path().join("data").join("clients.json")
        );
        assert_eq!(
            paths.outbox_file(),
            temp_dir.path().join("data").join("outbox.json")
        );
    }
}
