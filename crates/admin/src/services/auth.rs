//! Login stub.
//!
//! Any non-empty username and password pair is accepted. The landing page
//! and the session role are derived from the username alone.
//!
//! Sign-in waits out a simulated delay before any workspace exists, so the
//! busy flag for it lives in [`LoginGate`] rather than on a workspace.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;
use thiserror::Error;
use tower_sessions::session::Id;

use prifam_core::AdminRole;

use crate::error::AppError;
use crate::services::ActionKind;

/// Login form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Errors from the login form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter both username and password.")]
    MissingCredentials,
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: String,
    pub role: AdminRole,
}

impl LoginOutcome {
    /// Route to send the user to after login.
    #[must_use]
    pub const fn landing(&self) -> &'static str {
        landing_for(self.role)
    }
}

/// Home route for a role.
#[must_use]
pub const fn landing_for(role: AdminRole) -> &'static str {
    if role.is_super_admin() {
        "/super-admin"
    } else {
        "/dashboard"
    }
}

/// Check the login form and work out who is signing in.
///
/// A username containing "super" (any case) signs in as a super admin;
/// everyone else signs in as an admin. Whitespace-only fields count as empty.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] if either field is empty.
pub fn authenticate(form: &LoginForm) -> Result<LoginOutcome, AuthError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let role = if username.to_lowercase().contains("super") {
        AdminRole::SuperAdmin
    } else {
        AdminRole::Admin
    };

    Ok(LoginOutcome {
        username: username.to_string(),
        role,
    })
}

/// Sessions with a sign-in waiting out its delay.
///
/// A session without an ID has never been stored, so no other request can
/// share it and it is never gated.
#[derive(Debug, Default)]
pub struct LoginGate {
    pending: Mutex<HashSet<Id>>,
}

impl LoginGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the sign-in slot for `session` until the ticket is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Busy`] if the session already has a sign-in in
    /// flight.
    pub fn enter(&self, session: Option<Id>) -> Result<LoginTicket<'_>, AppError> {
        if let Some(id) = session {
            if !self.lock().insert(id) {
                return Err(AppError::Busy(ActionKind::Login));
            }
        }
        Ok(LoginTicket {
            gate: self,
            session,
        })
    }

    #[must_use]
    pub fn is_pending(&self, session: Id) -> bool {
        self.lock().contains(&session)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Id>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held for the duration of one sign-in. Dropping it, including when the
/// request is abandoned, frees the session's slot.
#[must_use]
#[derive(Debug)]
pub struct LoginTicket<'a> {
    gate: &'a LoginGate,
    session: Option<Id>,
}

impl Drop for LoginTicket<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.session {
            self.gate.lock().remove(&id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_superadmin_lands_on_super_admin() {
        let outcome = authenticate(&form("superadmin", "x")).unwrap();
        assert_eq!(outcome.role, AdminRole::SuperAdmin);
        assert_eq!(outcome.landing(), "/super-admin");
    }

    #[test]
    fn test_super_match_is_case_insensitive() {
        let outcome = authenticate(&form("The-SUPER-user", "x")).unwrap();
        assert_eq!(outcome.landing(), "/super-admin");
    }

    #[test]
    fn test_anyone_else_lands_on_dashboard() {
        let outcome = authenticate(&form("anything-else", "hunter2")).unwrap();
        assert_eq!(outcome.role, AdminRole::Admin);
        assert_eq!(outcome.landing(), "/dashboard");
    }

    #[test]
    fn test_empty_fields_blocked() {
        assert_eq!(authenticate(&form("", "pw")), Err(AuthError::MissingCredentials));
        assert_eq!(authenticate(&form("admin", "")), Err(AuthError::MissingCredentials));
        assert_eq!(authenticate(&form("   ", "pw")), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn test_landing_for_non_admin_roles() {
        assert_eq!(landing_for(AdminRole::Viewer), "/dashboard");
        assert_eq!(landing_for(AdminRole::Agent), "/dashboard");
    }

    #[test]
    fn test_gate_refuses_second_sign_in_for_same_session() {
        let gate = LoginGate::new();
        let session = Id::default();

        let ticket = gate.enter(Some(session)).unwrap();
        assert!(gate.is_pending(session));
        assert!(matches!(
            gate.enter(Some(session)),
            Err(AppError::Busy(ActionKind::Login))
        ));

        // Another browser is unaffected.
        let other = gate.enter(Some(Id::default())).unwrap();
        drop(other);

        drop(ticket);
        assert!(!gate.is_pending(session));
        assert!(gate.enter(Some(session)).is_ok());
    }

    #[test]
    fn test_gate_never_blocks_unsaved_sessions() {
        let gate = LoginGate::new();
        let _first = gate.enter(None).unwrap();
        assert!(gate.enter(None).is_ok());
    }
}
