//! Authentication route handlers for admin.
//!
//! Provides the login stub and logout. Any non-empty username and password
//! pair signs in; the username decides the role.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdminAuth, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::services::{LoginForm, authenticate, landing_for};
use crate::state::AppState;

use super::{render, render_with_status};

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    username: String,
    error_message: Option<String>,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login page, or skip it for a signed-in admin.
///
/// GET /
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if let Some(admin) = admin {
        return Redirect::to(landing_for(admin.role)).into_response();
    }

    render(&LoginPageTemplate {
        username: String::new(),
        error_message: None,
    })
}

/// Sign in.
///
/// POST /
#[instrument(skip(state, session, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let outcome = match authenticate(&form) {
        Ok(outcome) => outcome,
        Err(e) => {
            return render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                &LoginPageTemplate {
                    username: form.username,
                    error_message: Some(e.to_string()),
                },
            );
        }
    };

    // One sign-in per session at a time; the ticket is held until the new
    // identity is stored.
    let _ticket = match state.logins().enter(session.id()) {
        Ok(ticket) => ticket,
        Err(e) => return login_failed(&form.username, &e),
    };
    tokio::time::sleep(state.config().latency.login).await;

    // Signing in again replaces the previous workspace.
    if let Ok(Some(previous)) = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
    {
        state.workspaces().discard(previous.workspace).await;
    }
    let (workspace_id, _) = state.open_workspace().await;

    let admin = CurrentAdmin {
        username: outcome.username.clone(),
        role: outcome.role,
        workspace: workspace_id,
    };
    let stored = async {
        session.cycle_id().await?;
        set_current_admin(&session, &admin).await
    };
    if let Err(e) = stored.await {
        state.workspaces().discard(workspace_id).await;
        return AppError::from(e).into_response();
    }

    set_sentry_user(&admin.username, admin.role);
    tracing::info!(role = %admin.role, "Admin signed in");
    Redirect::to(outcome.landing()).into_response()
}

fn login_failed(username: &str, err: &AppError) -> Response {
    render_with_status(
        err.status(),
        &LoginPageTemplate {
            username: username.to_string(),
            error_message: Some(err.user_message()),
        },
    )
}

/// Logout, discard the workspace and clear the session.
///
/// POST /logout
#[instrument(skip(state, session))]
async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(admin)) = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
    {
        state.workspaces().discard(admin.workspace).await;
        tracing::info!(username = %admin.username, "Admin signed out");
    }

    if let Err(e) = session.flush().await {
        return AppError::from(e).into_response();
    }
    clear_sentry_user();

    Redirect::to("/").into_response()
}
