//! Hub resolution: turn a hub id into controller details.

use reqwest::header::COOKIE;

use crate::context::{Controller, SessionContext};
use crate::error::HiveError;
use crate::wire::hub_url;

/// Fetches controller details for a hub on behalf of an authenticated session.
///
/// Each call completes exactly once, with either the controller or an error.
/// The session manager never retries a failed resolution on its own.
pub trait HubResolver: Send {
    fn resolve(&self, context: &SessionContext, hub_id: &str) -> Result<Controller, HiveError>;
}

/// Default resolver: `GET {base}users/{username}/hubs/{hub_id}` with the session cookie.
#[derive(Clone)]
pub struct HttpHubResolver {
    http: reqwest::blocking::Client,
}

impl HttpHubResolver {
    pub fn new(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl HubResolver for HttpHubResolver {
    fn resolve(&self, context: &SessionContext, hub_id: &str) -> Result<Controller, HiveError> {
        let token = context.auth_token().ok_or(HiveError::NotAuthenticated)?;
        let url = hub_url(context.api_base_uri(), context.username(), hub_id)?;

        log::debug!("-> hub {}", url);
        let response = self.http.get(url)
            .header(COOKIE, token.cookie_header())
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        if status != 200 {
            return Err(HiveError::Status(status, body));
        }

        serde_json::from_str(&body)
            .map_err(|e| HiveError::Parse(format!("hub {}: {}", hub_id, e)))
    }
}
