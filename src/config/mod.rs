//! Configuration management for retainer-cli

pub mod paths;
pub mod settings;

pub use paths::RetainerPaths;
pub use settings::Settings;
