//! Hive CLI commands: hub, verify, config.
//!
//! `hive hub`     — log in, print the resolved controller, log out
//! `hive verify`  — log in and out to check credentials
//! `hive config`  — show the resolved configuration (never the password)
//!
//! Sessions never outlive the command: every command that logs in also
//! logs out before returning.

use std::path::PathBuf;

use hive_config::{ConfigError, HiveConfig};
use hive_hub_client::{ClientConfig, HiveError, HiveSession, LoginOutcome, SessionState};

use crate::exit_codes::*;
use crate::CliError;

/// Global flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct ConfigArgs {
    pub env: Option<String>,
    pub config: Option<PathBuf>,
}

// ── Config ──────────────────────────────────────────────────────────

fn load_config(args: &ConfigArgs) -> Result<HiveConfig, CliError> {
    let config = HiveConfig::load(args.env.as_deref(), args.config.as_deref()).map_err(config_error)?;
    log::info!("Using {} settings from {}", config.environment, config.path.display());
    Ok(config)
}

fn client_config(config: &HiveConfig) -> ClientConfig {
    ClientConfig::new(
        config.api_base_uri.clone(),
        config.username.clone(),
        config.password.clone(),
    )
}

pub fn cmd_config(args: &ConfigArgs, json: bool) -> Result<(), CliError> {
    let config = load_config(args)?;

    if json {
        let out = serde_json::json!({
            "environment": config.environment,
            "path": config.path.to_string_lossy(),
            "api_base_uri": config.api_base_uri,
            "username": config.username,
            "password_source": config.password_source.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&out).map_err(|e| CliError::error(e.to_string()))?);
    } else {
        println!("environment:  {}", config.environment);
        println!("settings:     {}", config.path.display());
        println!("api:          {}", config.api_base_uri);
        println!("username:     {}", config.username);
        println!("password:     (from {})", config.password_source.as_str());
    }
    Ok(())
}

// ── Hub ─────────────────────────────────────────────────────────────

pub fn cmd_hub(args: &ConfigArgs, json: bool) -> Result<(), CliError> {
    let config = load_config(args)?;
    let mut session = HiveSession::new(client_config(&config)).map_err(|e| hive_error(e, json))?;

    let result = session.login()
        .map_err(|e| hive_error(e, json))
        .and_then(|outcome| print_hub(&config, &outcome, json));

    let closed = end_session(&mut session, json);
    result.and(closed)
}

fn print_hub(config: &HiveConfig, outcome: &LoginOutcome, json: bool) -> Result<(), CliError> {
    if json {
        let out = serde_json::json!({
            "username": config.username,
            "user_id": outcome.user_id,
            "hub_id": outcome.hub_id,
            "controller": outcome.controller,
        });
        println!("{}", serde_json::to_string_pretty(&out).map_err(|e| CliError::error(e.to_string()))?);
        return Ok(());
    }

    eprintln!("Logged in as {} (user {})", config.username, outcome.user_id);
    match (&outcome.hub_id, &outcome.controller) {
        (Some(hub_id), Some(controller)) => {
            println!("hub:   {}", hub_id);
            if let Some(name) = controller.name() {
                println!("name:  {}", name);
            }
            if !controller.is_empty() {
                let details = serde_json::to_string_pretty(controller)
                    .map_err(|e| CliError::error(e.to_string()))?;
                println!("{}", details);
            }
        }
        _ => println!("No hub registered to this account"),
    }
    Ok(())
}

// ── Verify ──────────────────────────────────────────────────────────

pub fn cmd_verify(args: &ConfigArgs) -> Result<(), CliError> {
    let config = load_config(args)?;
    let mut session = HiveSession::new(client_config(&config)).map_err(|e| hive_error(e, false))?;

    let login = session.login();
    // A failed hub lookup still leaves a logged-in session behind
    let authenticated = matches!(session.state(), SessionState::PendingHub | SessionState::Ready);
    let closed = end_session(&mut session, false);

    match login {
        Ok(outcome) => eprintln!("Authenticated as {} (user {})", config.username, outcome.user_id),
        Err(e) if authenticated => {
            eprintln!("Authenticated as {} (hub lookup failed: {})", config.username, e);
        }
        Err(e) => return Err(hive_error(e, false)),
    }
    closed
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Log out if the session got far enough to hold a token.
fn end_session(session: &mut HiveSession, json: bool) -> Result<(), CliError> {
    match session.state() {
        SessionState::Unauthenticated | SessionState::Terminated => Ok(()),
        SessionState::PendingHub | SessionState::Ready => {
            session.logout().map_err(|e| hive_error(e, json))
        }
    }
}

fn config_error(e: ConfigError) -> CliError {
    let hint = match &e {
        ConfigError::Missing(_) => Some(format!(
            "edit {} or set HIVE_USERNAME / HIVE_PASSWORD",
            hive_config::Settings::config_dir().display(),
        )),
        _ => None,
    };
    CliError { code: EXIT_USAGE, message: e.to_string(), hint }
}

fn hive_error(e: HiveError, json: bool) -> CliError {
    let code = hive_exit_code(&e);
    if json {
        let out = ErrorOutput::from_hive_error(&e);
        if let Ok(line) = serde_json::to_string(&out) {
            eprintln!("{}", line);
            return CliError { code, message: String::new(), hint: None };
        }
    }

    let hint = match &e {
        HiveError::Authentication(..) => Some("check the username and password for this environment".into()),
        HiveError::Transport(_) => Some("check the api URI and your network connection".into()),
        _ => None,
    };
    CliError { code, message: e.to_string(), hint }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hive_error_codes() {
        let err = hive_error(HiveError::Authentication(401, String::new()), false);
        assert_eq!(err.code, EXIT_HIVE_AUTH);
        assert!(err.hint.is_some());

        let err = hive_error(HiveError::Status(500, "boom".into()), false);
        assert_eq!(err.code, EXIT_HIVE_PROTOCOL);
        assert_eq!(err.message, "HTTP 500: boom");
    }

    #[test]
    fn test_json_error_has_empty_message() {
        let err = hive_error(HiveError::Transport("refused".into()), true);
        assert_eq!(err.code, EXIT_HIVE_NETWORK);
        assert!(err.message.is_empty());
    }

    #[test]
    fn test_config_error_is_usage() {
        let err = config_error(ConfigError::Missing("credentials.username"));
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.message.contains("credentials.username"));
        assert!(err.hint.is_some());
    }
}
