// Password lookup
//
// The account password is resolved from, in order:
// 1. HIVE_PASSWORD environment variable (CI/headless)
// 2. The environment's settings file
// 3. System keychain (only with the `keychain` feature)
//
// Lookup is read-only: nothing here ever stores a password.

/// Service name for keychain storage
#[cfg_attr(not(feature = "keychain"), allow(dead_code))]
const KEYCHAIN_SERVICE: &str = "hive";

/// Source of the account password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// HIVE_PASSWORD environment variable
    Environment,
    /// Settings file
    File,
    /// System keychain
    Keychain,
    /// No password found
    None,
}

impl PasswordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordSource::Environment => "environment",
            PasswordSource::File => "file",
            PasswordSource::Keychain => "keychain",
            PasswordSource::None => "none",
        }
    }
}

/// Result of password lookup
#[derive(Clone)]
pub struct PasswordLookup {
    pub password: Option<String>,
    pub source: PasswordSource,
}

impl std::fmt::Debug for PasswordLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordLookup")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve the password for `username`.
pub fn get_password(username: &str, from_env: Option<String>, from_file: Option<&str>) -> PasswordLookup {
    if let Some(password) = from_env {
        return PasswordLookup { password: Some(password), source: PasswordSource::Environment };
    }

    if let Some(password) = from_file.filter(|p| !p.is_empty()) {
        return PasswordLookup { password: Some(password.to_string()), source: PasswordSource::File };
    }

    #[cfg(feature = "keychain")]
    {
        match keyring::Entry::new(KEYCHAIN_SERVICE, username) {
            Ok(entry) => {
                if let Ok(password) = entry.get_password() {
                    return PasswordLookup { password: Some(password), source: PasswordSource::Keychain };
                }
            }
            Err(e) => log::debug!("Keychain unavailable: {}", e),
        }
    }
    #[cfg(not(feature = "keychain"))]
    let _ = username;

    PasswordLookup { password: None, source: PasswordSource::None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_beats_file() {
        let lookup = get_password("alice", Some("from-env".into()), Some("from-file"));
        assert_eq!(lookup.source, PasswordSource::Environment);
        assert_eq!(lookup.password.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_file_fallback() {
        let lookup = get_password("alice", None, Some("from-file"));
        assert_eq!(lookup.source, PasswordSource::File);
        assert_eq!(lookup.password.as_deref(), Some("from-file"));
    }

    #[cfg(not(feature = "keychain"))]
    #[test]
    fn test_missing_password() {
        let lookup = get_password("nonexistent_user_xyz", None, Some(""));
        assert_eq!(lookup.source, PasswordSource::None);
        assert!(lookup.password.is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let lookup = get_password("alice", None, Some("hunter2"));
        let dbg = format!("{:?}", lookup);
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn test_source_names() {
        assert_eq!(PasswordSource::Environment.as_str(), "environment");
        assert_eq!(PasswordSource::Keychain.as_str(), "keychain");
    }
}
