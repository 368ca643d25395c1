//! Session-related types for the signed-in admin.

use serde::{Deserialize, Serialize};

use prifam_core::AdminRole;

use crate::store::WorkspaceId;

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the signed-in admin and
/// the working copy that belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Name typed on the login form.
    pub username: String,
    /// Role chosen at login; drives the menu and the route gates.
    pub role: AdminRole,
    /// Working copy owned by this session.
    pub workspace: WorkspaceId,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for a one-shot success message shown on the next page.
    pub const FLASH: &str = "flash";
}
