//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | Usage or configuration error             |
//! | 40-49   | hive             | Hive API session codes                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `hive_exit_code`

use hive_hub_client::{ErrorKind, HiveError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable or incomplete settings.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Hive (40-49)
// =============================================================================

/// Login rejected (wrong username/password).
pub const EXIT_HIVE_AUTH: u8 = 40;

/// Cannot reach the API (connection refused, DNS, TLS, timeout).
pub const EXIT_HIVE_NETWORK: u8 = 42;

/// API answered with an unexpected status or an unparseable body.
pub const EXIT_HIVE_PROTOCOL: u8 = 43;

/// Operation not valid for the session state (not logged in, no hub, logged out).
pub const EXIT_HIVE_STATE: u8 = 44;

/// Map a session error to its exit code.
pub fn hive_exit_code(err: &HiveError) -> u8 {
    match err.kind() {
        ErrorKind::Authentication => EXIT_HIVE_AUTH,
        ErrorKind::Transport => EXIT_HIVE_NETWORK,
        ErrorKind::Protocol => EXIT_HIVE_PROTOCOL,
        ErrorKind::State => EXIT_HIVE_STATE,
    }
}

/// Structured error output for `--json` commands.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn from_hive_error(err: &HiveError) -> Self {
        let error = match err {
            HiveError::Transport(_) => "transport_error",
            HiveError::Authentication(..) => "auth_failed",
            HiveError::Status(..) => "unexpected_status",
            HiveError::Parse(_) => "malformed_response",
            HiveError::NotAuthenticated => "not_authenticated",
            HiveError::NoHub => "no_hub",
            HiveError::Terminated => "terminated",
        };

        Self {
            error,
            message: err.to_string(),
            status: err.status(),
            exit_code: hive_exit_code(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_kind() {
        assert_eq!(hive_exit_code(&HiveError::Authentication(401, String::new())), EXIT_HIVE_AUTH);
        assert_eq!(hive_exit_code(&HiveError::Transport("refused".into())), EXIT_HIVE_NETWORK);
        assert_eq!(hive_exit_code(&HiveError::Status(500, String::new())), EXIT_HIVE_PROTOCOL);
        assert_eq!(hive_exit_code(&HiveError::Parse("eof".into())), EXIT_HIVE_PROTOCOL);
        assert_eq!(hive_exit_code(&HiveError::Terminated), EXIT_HIVE_STATE);
    }

    #[test]
    fn test_error_output_shape() {
        let out = ErrorOutput::from_hive_error(&HiveError::Authentication(401, "bad password".into()));
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"], "auth_failed");
        assert_eq!(json["status"], 401);
        assert_eq!(json["exit_code"], 40);

        let out = ErrorOutput::from_hive_error(&HiveError::NoHub);
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("status").is_none());
    }
}
