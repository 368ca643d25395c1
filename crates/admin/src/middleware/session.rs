//! Session middleware configuration for admin.
//!
//! Sessions live in process memory, like the rest of the dashboard's state,
//! with strict cookie settings (SameSite=Strict, 24hr inactivity expiry).

use std::time::Duration;

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "prifam_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Inactivity after which a session, and the workspace it owns, expires.
pub const SESSION_IDLE_TIMEOUT: Duration =
    Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs());

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
