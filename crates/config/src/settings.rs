// Account settings
// Loaded from ~/.config/hive/<environment>.toml

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::secrets::{self, PasswordSource};
use crate::ConfigError;

/// Environment used when neither `--env` nor `HIVE_ENV` is given
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Production v5 API root
pub const DEFAULT_API_URI: &str = "https://api.hivehome.com/v5/";

/// Environment variable names
pub const ENV_ENVIRONMENT: &str = "HIVE_ENV";
pub const ENV_API_URI: &str = "HIVE_API_URI";
pub const ENV_USERNAME: &str = "HIVE_USERNAME";
pub const ENV_PASSWORD: &str = "HIVE_PASSWORD";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Root of the v5 REST API, e.g. "https://api.hivehome.com/v5/"
    pub v5: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self { v5: DEFAULT_API_URI.to_string() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    pub username: String,
    pub password: Option<String>,
}

/// On-disk layout of an environment file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub credentials: CredentialSettings,
}

impl Settings {
    /// Directory holding one file per environment
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hive")
    }

    /// Get the settings file path for an environment
    pub fn config_path(environment: &str) -> PathBuf {
        Self::config_dir().join(format!("{}.toml", environment))
    }

    /// Parse a settings file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Apply `HIVE_API_URI` / `HIVE_USERNAME` overrides. Empty values are ignored.
    /// The password override is resolved separately so its source can be reported.
    pub fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(uri) = non_empty(lookup(ENV_API_URI)) {
            self.api.v5 = uri;
        }
        if let Some(username) = non_empty(lookup(ENV_USERNAME)) {
            self.credentials.username = username;
        }
    }
}

/// Fully resolved configuration, read once at process start.
#[derive(Clone)]
pub struct HiveConfig {
    pub environment: String,
    pub path: PathBuf,
    /// Always ends with '/'
    pub api_base_uri: String,
    pub username: String,
    pub password: String,
    pub password_source: PasswordSource,
}

impl std::fmt::Debug for HiveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HiveConfig")
            .field("environment", &self.environment)
            .field("path", &self.path)
            .field("api_base_uri", &self.api_base_uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("password_source", &self.password_source)
            .finish()
    }
}

impl HiveConfig {
    /// Pick the environment: explicit value > HIVE_ENV > "development"
    pub fn resolve_environment(explicit: Option<&str>) -> String {
        explicit
            .map(String::from)
            .or_else(|| env::var(ENV_ENVIRONMENT).ok())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    /// Load configuration for an environment from the default location,
    /// or from `path_override` if given.
    pub fn load(environment: Option<&str>, path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let environment = Self::resolve_environment(environment);
        let path = path_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Settings::config_path(&environment));

        let lookup = |name: &str| env::var(name).ok();
        let mut settings = Settings::load_from(&path)?;
        settings.apply_overrides(&lookup);

        Self::from_settings(environment, path, settings, &lookup)
    }

    /// Validate settings and resolve the password.
    pub fn from_settings(
        environment: String,
        path: PathBuf,
        settings: Settings,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_base_uri = normalize_base_uri(&settings.api.v5)
            .ok_or(ConfigError::Missing("api.v5"))?;

        let username = settings.credentials.username.trim().to_string();
        if username.is_empty() {
            return Err(ConfigError::Missing("credentials.username"));
        }

        let found = secrets::get_password(
            &username,
            non_empty(lookup(ENV_PASSWORD)),
            settings.credentials.password.as_deref(),
        );
        let (password, password_source) = match found.password {
            Some(p) => (p, found.source),
            None => return Err(ConfigError::Missing("credentials.password")),
        };

        log::debug!(
            "Loaded {} configuration for {} (password from {})",
            environment, username, password_source.as_str(),
        );

        Ok(Self { environment, path, api_base_uri, username, password, password_source })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Trim and make sure the URI ends with '/', so `{base}login` is well formed.
pub fn normalize_base_uri(uri: &str) -> Option<String> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.ends_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}/", trimmed))
    }
}
