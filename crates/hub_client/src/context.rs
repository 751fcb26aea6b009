//! Session context: everything the manager knows about the logged-in account.

use serde::{Deserialize, Serialize};

/// Name of the session cookie issued by login.
pub const SESSION_COOKIE: &str = "ApiSession";

/// Session token returned by login, sent back as the `ApiSession` cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Resolved hub metadata, passed through from the API as-is.
///
/// The object is stored verbatim, so serializing a controller reproduces
/// the object it came from. `name` is read on demand and is `None` when
/// absent or not a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Controller(serde_json::Map<String, serde_json::Value>);

impl Controller {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(serde_json::Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Controller {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Where a session manager is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Logged in, hub known, controller not resolved yet
    PendingHub,
    /// Logged in and fully resolved (or the account has no hub)
    Ready,
    /// Logged out; absorbing
    Terminated,
}

/// Mutable per-session record.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub(crate) auth_token: Option<AuthToken>,
    pub(crate) username: String,
    pub(crate) user_id: Option<String>,
    pub(crate) api_base_uri: String,
    pub(crate) hub_id: Option<String>,
    pub(crate) controller: Option<Controller>,
}

impl SessionContext {
    pub fn new(api_base_uri: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            auth_token: None,
            username: username.into(),
            user_id: None,
            api_base_uri: api_base_uri.into(),
            hub_id: None,
            controller: None,
        }
    }

    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn api_base_uri(&self) -> &str {
        &self.api_base_uri
    }

    pub fn hub_id(&self) -> Option<&str> {
        self.hub_id.as_deref()
    }

    pub fn controller(&self) -> Option<&Controller> {
        self.controller.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// `{api_base_uri}{path}`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_uri, path)
    }

    /// Record a successful login. Token and user id are always set together;
    /// any controller from an earlier login is dropped.
    pub(crate) fn authenticate(&mut self, token: AuthToken, user_id: String, hub_id: Option<String>) {
        self.auth_token = Some(token);
        self.user_id = Some(user_id);
        self.hub_id = hub_id;
        self.controller = None;
    }

    pub(crate) fn state(&self) -> SessionState {
        if !self.is_authenticated() {
            SessionState::Unauthenticated
        } else if self.hub_id.is_some() && self.controller.is_none() {
            SessionState::PendingHub
        } else {
            SessionState::Ready
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let token = AuthToken::new("abc");
        assert_eq!(token.cookie_header(), "ApiSession=abc");
        assert_eq!(token.as_str(), "abc");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-token");
        assert!(!format!("{:?}", token).contains("secret-token"));
    }

    #[test]
    fn test_new_context_is_empty() {
        let ctx = SessionContext::new("https://api.example/v5/", "alice");
        assert!(ctx.auth_token().is_none());
        assert!(ctx.user_id().is_none());
        assert!(ctx.hub_id().is_none());
        assert!(ctx.controller().is_none());
        assert_eq!(ctx.username(), "alice");
        assert_eq!(ctx.state(), SessionState::Unauthenticated);
        assert_eq!(ctx.endpoint("login"), "https://api.example/v5/login");
    }

    #[test]
    fn test_state_transitions() {
        let mut ctx = SessionContext::new("http://x/", "alice");
        ctx.authenticate(AuthToken::new("t"), "u1".into(), Some("h1".into()));
        assert_eq!(ctx.state(), SessionState::PendingHub);

        ctx.controller = Some(Controller::default());
        assert_eq!(ctx.state(), SessionState::Ready);

        // Re-login drops the old controller
        ctx.authenticate(AuthToken::new("t2"), "u1".into(), Some("h2".into()));
        assert!(ctx.controller().is_none());
        assert_eq!(ctx.hub_id(), Some("h2"));
    }

    #[test]
    fn test_no_hub_is_ready() {
        let mut ctx = SessionContext::new("http://x/", "alice");
        ctx.authenticate(AuthToken::new("t"), "u1".into(), None);
        assert_eq!(ctx.state(), SessionState::Ready);
    }

    #[test]
    fn test_controller_passthrough() {
        let raw = serde_json::json!({
            "name": "Hub1",
            "id": 42,
            "online": true,
            "devices": [{"type": "thermostat"}],
        });

        let controller: Controller = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(controller.name(), Some("Hub1"));
        assert_eq!(controller.get("online"), Some(&serde_json::json!(true)));

        assert_eq!(serde_json::to_value(&controller).unwrap(), raw);
    }

    #[test]
    fn test_controller_keeps_null_name() {
        let raw = serde_json::json!({"name": null, "id": 1});
        let controller: Controller = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(controller.name(), None);
        assert_eq!(serde_json::to_value(&controller).unwrap(), raw);
    }

    #[test]
    fn test_controller_accepts_non_string_name() {
        for raw in [
            serde_json::json!({"name": 7, "id": 1}),
            serde_json::json!({"name": {"en": "Hub1"}}),
        ] {
            let controller: Controller = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(controller.name(), None);
            assert_eq!(serde_json::to_value(&controller).unwrap(), raw);
        }
    }

    #[test]
    fn test_controller_rejects_non_object() {
        assert!(serde_json::from_str::<Controller>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Controller>(r#""Hub1""#).is_err());
    }
}
