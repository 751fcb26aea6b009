//! Hive API client.
//!
//! This crate is the single source of truth for the v5 session contract:
//! login, hub/controller resolution, logout.
//!
//! No retries. No persistence of credentials or tokens. One hub per session.

mod client;
mod context;
mod error;
mod events;
mod hubs;
mod wire;

pub use client::{ClientConfig, HiveSession, LoginOutcome};
pub use context::{AuthToken, Controller, SessionContext, SessionState, SESSION_COOKIE};
pub use error::{ErrorKind, HiveError};
pub use events::SessionEvent;
pub use hubs::{HttpHubResolver, HubResolver};
pub use wire::{hub_url, LoginResponse, CALLER, USER_AGENT};
