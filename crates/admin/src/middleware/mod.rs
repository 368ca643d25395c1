//! HTTP middleware for admin.
//!
//! - [`auth`] - Extractors gating routes on the signed-in admin and role
//! - [`session`] - tower-sessions layer with an in-memory store

pub mod auth;
pub mod session;

pub use auth::{
    AdminContext, OptionalAdminAuth, RequireAdminAuth, RequireSuperAdmin, clear_current_admin,
    set_current_admin, set_flash, take_flash,
};
pub use session::{SESSION_COOKIE_NAME, SESSION_IDLE_TIMEOUT, create_session_layer};
