//! Request and response shapes for the v5 REST API.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::HiveError;

/// Fixed client identifier sent on every request.
pub const USER_AGENT: &str = "bg-hive-api/0.1.0";

/// `caller` value the login endpoint expects.
pub const CALLER: &str = "HiveHome";

pub const LOGIN_PATH: &str = "login";
pub const LOGOUT_PATH: &str = "logout";

/// Form body for `POST {base}login`.
#[derive(Serialize)]
pub(crate) struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub caller: &'a str,
}

/// Successful login body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "ApiSession")]
    pub api_session: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "hubIds", default)]
    pub hub_ids: Option<Vec<String>>,
}

impl LoginResponse {
    pub fn parse(body: &str) -> Result<Self, HiveError> {
        let resp: LoginResponse = serde_json::from_str(body)
            .map_err(|e| HiveError::Parse(format!("login response: {}", e)))?;

        if resp.api_session.is_empty() {
            return Err(HiveError::Parse("login response: empty ApiSession".into()));
        }
        Ok(resp)
    }

    /// Only the first hub is used; multi-hub accounts are truncated.
    pub fn first_hub(&self) -> Option<&str> {
        self.hub_ids.as_ref()?.first().map(String::as_str)
    }
}

/// `{base}users/{username}/hubs/{hub_id}`, each segment percent-encoded.
pub fn hub_url(api_base_uri: &str, username: &str, hub_id: &str) -> Result<Url, HiveError> {
    let mut url = Url::parse(api_base_uri)
        .map_err(|e| HiveError::Transport(format!("invalid api URI {}: {}", api_base_uri, e)))?;
    url.path_segments_mut()
        .map_err(|_| HiveError::Transport(format!("invalid api URI {}", api_base_uri)))?
        .pop_if_empty()
        .extend(["users", username, "hubs", hub_id]);
    Ok(url)
}
