//! Session manager: login, hub resolution, logout.
//!
//! Blocking reqwest client (no Tokio runtime required). Every operation
//! takes `&mut self`, so a login and a logout on the same session can never
//! overlap. Failures are logged here and returned to the caller; nothing
//! is retried.

use std::sync::mpsc;
use std::time::Duration;

use reqwest::header::COOKIE;

use crate::context::{AuthToken, Controller, SessionContext, SessionState};
use crate::error::HiveError;
use crate::events::{EventBus, SessionEvent};
use crate::hubs::{HttpHubResolver, HubResolver};
use crate::wire::{LoginForm, LoginResponse, CALLER, LOGIN_PATH, LOGOUT_PATH, USER_AGENT};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything a session needs to talk to the API.
#[derive(Clone)]
pub struct ClientConfig {
    /// Endpoint root; always ends with '/'
    pub api_base_uri: String,
    pub username: String,
    pub password: String,
    /// Bound on each individual request
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_uri: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let mut api_base_uri = api_base_uri.into();
        if !api_base_uri.ends_with('/') {
            api_base_uri.push('/');
        }
        Self {
            api_base_uri,
            username: username.into(),
            password: password.into(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_uri", &self.api_base_uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// What a successful login produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user_id: String,
    /// First hub on the account, if any
    pub hub_id: Option<String>,
    pub controller: Option<Controller>,
}

/// One authenticated session against the API.
pub struct HiveSession {
    http: reqwest::blocking::Client,
    password: String,
    /// `None` once logged out
    context: Option<SessionContext>,
    resolver: Box<dyn HubResolver>,
    events: EventBus,
}

impl HiveSession {
    /// Create a session that resolves hubs over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, HiveError> {
        let http = build_http(config.request_timeout)?;
        let resolver = HttpHubResolver::new(http.clone());
        Ok(Self::assemble(config, http, Box::new(resolver)))
    }

    /// Create a session with a custom hub resolver.
    pub fn with_resolver(config: ClientConfig, resolver: impl HubResolver + 'static) -> Result<Self, HiveError> {
        let http = build_http(config.request_timeout)?;
        Ok(Self::assemble(config, http, Box::new(resolver)))
    }

    fn assemble(config: ClientConfig, http: reqwest::blocking::Client, resolver: Box<dyn HubResolver>) -> Self {
        Self {
            http,
            password: config.password,
            context: Some(SessionContext::new(config.api_base_uri, config.username)),
            resolver,
            events: EventBus::default(),
        }
    }

    /// Current context, or `None` after logout.
    pub fn context(&self) -> Option<&SessionContext> {
        self.context.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match &self.context {
            Some(ctx) => ctx.state(),
            None => SessionState::Terminated,
        }
    }

    /// Receive a [`SessionEvent`] for every successful operation from now on.
    pub fn subscribe(&mut self) -> mpsc::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Log in and, if the account has a hub, resolve its controller.
    ///
    /// Session fields are stored as soon as the login call succeeds. If hub
    /// resolution then fails, the session stays in [`SessionState::PendingHub`]
    /// and [`resolve_controller`](Self::resolve_controller) can be called later.
    pub fn login(&mut self) -> Result<LoginOutcome, HiveError> {
        let context = self.context.as_ref().ok_or(HiveError::Terminated).map_err(|e| logged("login", e))?;
        let url = context.endpoint(LOGIN_PATH);
        let form = LoginForm {
            username: context.username(),
            password: &self.password,
            caller: CALLER,
        };

        log::info!("-> login {}", url);
        let response = self.http.post(&url)
            .form(&form)
            .send()
            .map_err(|e| logged("login", e.into()))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| logged("login", e.into()))?;
        if status != 200 {
            return Err(logged("login", HiveError::Authentication(status, body)));
        }

        let resp = LoginResponse::parse(&body).map_err(|e| logged("login", e))?;
        let hub_id = resp.first_hub().map(String::from);
        if resp.hub_ids.as_ref().map_or(0, Vec::len) > 1 {
            log::debug!("Account has several hubs; using {:?}", hub_id);
        }

        let context = self.context.as_mut().ok_or(HiveError::Terminated)?;
        context.authenticate(AuthToken::new(resp.api_session), resp.user_id.clone(), hub_id.clone());
        log::info!("Logged in as {} (user {})", context.username(), resp.user_id);

        let controller = match hub_id {
            Some(_) => Some(self.resolve_and_store()?),
            None => {
                log::info!("Account has no hub; skipping controller lookup");
                None
            }
        };

        self.events.emit(SessionEvent::Login(controller.clone()));
        Ok(LoginOutcome { user_id: resp.user_id, hub_id, controller })
    }

    /// Resolve the controller for the stored hub id again.
    ///
    /// Meant for a session left in [`SessionState::PendingHub`] by a failed
    /// resolution; emits [`SessionEvent::Login`] on success.
    pub fn resolve_controller(&mut self) -> Result<Controller, HiveError> {
        let controller = self.resolve_and_store()?;
        self.events.emit(SessionEvent::Login(Some(controller.clone())));
        Ok(controller)
    }

    fn resolve_and_store(&mut self) -> Result<Controller, HiveError> {
        let context = self.context.as_ref().ok_or(HiveError::Terminated).map_err(|e| logged("hub", e))?;
        if !context.is_authenticated() {
            return Err(logged("hub", HiveError::NotAuthenticated));
        }
        let hub_id = context.hub_id().ok_or(HiveError::NoHub).map_err(|e| logged("hub", e))?.to_string();

        log::debug!("Resolving hub {}", hub_id);
        let controller = self.resolver.resolve(context, &hub_id).map_err(|e| logged("hub", e))?;

        if let Some(context) = self.context.as_mut() {
            context.controller = Some(controller.clone());
        }
        log::info!("Hub {} resolved", hub_id);
        Ok(controller)
    }

    /// End the session. On success the context is discarded and every
    /// later operation fails with [`HiveError::Terminated`].
    pub fn logout(&mut self) -> Result<(), HiveError> {
        let context = self.context.as_ref().ok_or(HiveError::Terminated).map_err(|e| logged("logout", e))?;
        let token = context.auth_token().ok_or(HiveError::NotAuthenticated).map_err(|e| logged("logout", e))?;
        let url = context.endpoint(LOGOUT_PATH);

        log::info!("-> logout {}", url);
        let response = self.http.post(&url)
            .header(COOKIE, token.cookie_header())
            .send()
            .map_err(|e| logged("logout", e.into()))?;

        let status = response.status().as_u16();
        if status != 204 {
            let body = response.text().unwrap_or_default();
            return Err(logged("logout", HiveError::Status(status, body)));
        }

        self.context = None;
        log::info!("Logged out");
        self.events.emit(SessionEvent::Logout);
        Ok(())
    }
}

fn build_http(timeout: Duration) -> Result<reqwest::blocking::Client, HiveError> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(HiveError::from)
}

fn logged(op: &str, err: HiveError) -> HiveError {
    log::warn!("{} failed: {}", op, err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverResolver;

    impl HubResolver for NeverResolver {
        fn resolve(&self, _: &SessionContext, hub_id: &str) -> Result<Controller, HiveError> {
            panic!("resolver called for {}", hub_id);
        }
    }

    fn offline_session() -> HiveSession {
        // Port 9 (discard) on localhost; nothing in these tests reaches the network
        let config = ClientConfig::new("http://127.0.0.1:9/v5", "alice", "pw");
        HiveSession::with_resolver(config, NeverResolver).unwrap()
    }

    #[test]
    fn test_config_normalizes_base() {
        let config = ClientConfig::new("http://host/v5", "a", "b");
        assert_eq!(config.api_base_uri, "http://host/v5/");
        assert_eq!(config.request_timeout, Duration::from_secs(60));

        let config = ClientConfig::new("http://host/v5/", "a", "b").with_timeout(Duration::from_secs(5));
        assert_eq!(config.api_base_uri, "http://host/v5/");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = ClientConfig::new("http://host/", "alice", "hunter2");
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("alice"));
    }

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = offline_session();
        assert_eq!(session.state(), SessionState::Unauthenticated);

        let ctx = session.context().unwrap();
        assert_eq!(ctx.username(), "alice");
        assert_eq!(ctx.api_base_uri(), "http://127.0.0.1:9/v5/");
        assert!(ctx.auth_token().is_none());
    }

    #[test]
    fn test_logout_before_login_is_not_authenticated() {
        let mut session = offline_session();
        let events = session.subscribe();

        let err = session.logout().unwrap_err();
        assert!(matches!(err, HiveError::NotAuthenticated));
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_resolve_before_login_is_not_authenticated() {
        let mut session = offline_session();
        assert!(matches!(session.resolve_controller(), Err(HiveError::NotAuthenticated)));
    }
}
