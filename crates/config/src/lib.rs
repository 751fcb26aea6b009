// Configuration loading

pub mod secrets;
pub mod settings;

pub use secrets::{PasswordLookup, PasswordSource};
pub use settings::{HiveConfig, Settings};

/// Error loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read
    Io(String),
    /// Settings file is not valid TOML for the expected layout
    Parse(String),
    /// A required value is absent after all sources were consulted
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Cannot read settings: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid settings: {}", msg),
            ConfigError::Missing(key) => write!(f, "Missing required setting `{}`", key),
        }
    }
}

impl std::error::Error for ConfigError {}
