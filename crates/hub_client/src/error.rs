//! Error taxonomy for session operations.

/// Broad class of a [`HiveError`], for callers that branch on category
/// rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network or connection failure
    Transport,
    /// Unexpected status code or malformed body on a success status
    Protocol,
    /// Login rejected by the server
    Authentication,
    /// Operation not valid in the session's current state
    State,
}

/// Error type for session operations.
#[derive(Debug)]
pub enum HiveError {
    /// Network error (connect, TLS, timeout, body read)
    Transport(String),
    /// Login returned a status other than 200
    Authentication(u16, String),
    /// Unexpected HTTP status with response body
    Status(u16, String),
    /// JSON body did not match the expected schema
    Parse(String),
    /// Operation requires a logged-in session
    NotAuthenticated,
    /// Account has no hub to resolve
    NoHub,
    /// Session was logged out; no further operations are defined
    Terminated,
}

impl HiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HiveError::Transport(_) => ErrorKind::Transport,
            HiveError::Authentication(..) => ErrorKind::Authentication,
            HiveError::Status(..) | HiveError::Parse(_) => ErrorKind::Protocol,
            HiveError::NotAuthenticated | HiveError::NoHub | HiveError::Terminated => ErrorKind::State,
        }
    }

    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HiveError::Authentication(code, _) | HiveError::Status(code, _) => Some(*code),
            _ => None,
        }
    }
}

impl std::fmt::Display for HiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HiveError::Transport(msg) => write!(f, "Network error: {}", msg),
            HiveError::Authentication(code, msg) if msg.is_empty() => write!(f, "Login rejected (HTTP {})", code),
            HiveError::Authentication(code, msg) => write!(f, "Login rejected (HTTP {}): {}", code, msg),
            HiveError::Status(code, msg) if msg.is_empty() => write!(f, "HTTP {}", code),
            HiveError::Status(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            HiveError::Parse(msg) => write!(f, "Parse error: {}", msg),
            HiveError::NotAuthenticated => write!(f, "Not authenticated: log in first"),
            HiveError::NoHub => write!(f, "Account has no hub"),
            HiveError::Terminated => write!(f, "Session already logged out"),
        }
    }
}

impl std::error::Error for HiveError {}

impl From<reqwest::Error> for HiveError {
    fn from(e: reqwest::Error) -> Self {
        HiveError::Transport(e.to_string())
    }
}
