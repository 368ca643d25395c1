//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring a signed-in admin in route handlers.
//! A signed-in admin always comes with the workspace their session owns.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;
use crate::store::WorkspaceHandle;

/// The signed-in admin together with their workspace.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin: CurrentAdmin,
    pub workspace: WorkspaceHandle,
}

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(ctx): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", ctx.admin.username)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminContext);

/// Error returned when admin authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// No session layer is installed.
    Unauthorized,
    /// Signed in, but without the required role.
    Forbidden,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only super admins can access this page",
            )
                .into_response(),
        }
    }
}

/// Resolve the session identity and its workspace.
///
/// A session whose workspace is gone is signed out.
async fn load_admin(parts: &Parts, state: &AppState) -> Result<AdminContext, AdminAuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AdminAuthRejection::Unauthorized)?;

    let admin: CurrentAdmin = session
        .get(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .ok_or(AdminAuthRejection::RedirectToLogin)?;

    let Some(workspace) = state.workspaces().get(admin.workspace).await else {
        tracing::warn!(workspace = %admin.workspace, "Session workspace missing, signing out");
        if let Err(e) = clear_current_admin(session).await {
            tracing::error!(error = %e, "Failed to clear stale session");
        }
        return Err(AdminAuthRejection::RedirectToLogin);
    };

    Ok(AdminContext { admin, workspace })
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        load_admin(parts, &state).await.map(Self)
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin is not logged in.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Extractor that requires super admin authentication.
///
/// If the admin is not logged in, redirects to login.
/// If the admin is not a super admin, returns 403 Forbidden.
pub struct RequireSuperAdmin(pub AdminContext);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let ctx = load_admin(parts, &state).await?;

        if !ctx.admin.role.is_super_admin() {
            tracing::warn!(
                username = %ctx.admin.username,
                role = %ctx.admin.role,
                path = %parts.uri.path(),
                "Super admin page refused"
            );
            return Err(AdminAuthRejection::Forbidden);
        }

        Ok(Self(ctx))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}

/// Store a one-shot message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, message).await
}

/// Take the pending one-shot message, if any.
pub async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flash_is_one_shot() {
        let session = session();
        set_flash(&session, "User created").await.unwrap();
        assert_eq!(take_flash(&session).await.as_deref(), Some("User created"));
        assert_eq!(take_flash(&session).await, None);
    }

    #[tokio::test]
    async fn test_clear_current_admin() {
        let session = session();
        let admin = CurrentAdmin {
            username: "superadmin".to_string(),
            role: prifam_core::AdminRole::SuperAdmin,
            workspace: crate::store::WorkspaceId::new(),
        };
        set_current_admin(&session, &admin).await.unwrap();
        let stored: Option<CurrentAdmin> = session.get(session_keys::CURRENT_ADMIN).await.unwrap();
        assert_eq!(stored, Some(admin));

        clear_current_admin(&session).await.unwrap();
        let stored: Option<CurrentAdmin> = session.get(session_keys::CURRENT_ADMIN).await.unwrap();
        assert_eq!(stored, None);
    }
}
