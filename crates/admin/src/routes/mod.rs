//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Health check
//!
//! # Auth (any non-empty username and password)
//! GET  /                                    - Login page
//! POST /                                    - Submit login
//! POST /logout                              - Logout, discard workspace
//!
//! # Dashboards
//! GET  /dashboard                           - Admin dashboard
//! GET  /super-admin                         - Super admin dashboard (super admin only)
//! GET  /admin-management                    - Alias of /super-admin
//!
//! # Reviews
//! GET  /reviews                             - Filterable review list with detail panel
//!
//! # Upload & analysis
//! GET  /upload                              - Upload form, history, manual analysis
//! POST /upload/file                         - Stage a CSV/Excel file
//! POST /upload/process                      - Process the staged file
//! POST /upload/analyze                      - Classify a manually entered review
//!
//! # Site configuration
//! GET  /configuration                       - Platform list grouped by category
//! GET  /settings                            - Alias of /configuration
//! POST /configuration/platforms/{id}/toggle - Toggle a platform
//! POST /configuration/save                  - Save changes
//! POST /configuration/reset                 - Restore defaults
//!
//! # Users
//! GET  /user-management                     - Filterable user list
//! GET  /create-user                         - Create-user form
//! POST /create-user                         - Create a user
//! ```

pub mod auth;
pub mod configuration;
pub mod dashboard;
pub mod reviews;
pub mod upload;
pub mod users;

use askama::Template;
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use prifam_core::AdminRole;

use crate::components::{NavMenu, menu_for};
use crate::error::AppError;
use crate::middleware::create_session_layer;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub role: String,
    pub initials: String,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        let initials: String = admin
            .username
            .split(|c: char| !c.is_alphanumeric())
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();
        Self {
            name: admin.username.clone(),
            role: admin.role.title().to_string(),
            initials,
            is_super_admin: admin.role == AdminRole::SuperAdmin,
        }
    }
}

/// Everything the shared layout needs: who is signed in, the menu, and a
/// one-shot message.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub admin_user: AdminUserView,
    pub nav: NavMenu,
    pub current_path: String,
    pub flash: Option<String>,
}

impl PageChrome {
    #[must_use]
    pub fn new(admin: &CurrentAdmin, current_path: &str, flash: Option<String>) -> Self {
        Self {
            admin_user: AdminUserView::from(admin),
            nav: menu_for(admin.role).with_active(current_path),
            current_path: current_path.to_string(),
            flash,
        }
    }
}

/// Not-found page template.
#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    path: String,
}

/// Render a template, logging and hiding render failures.
pub(crate) fn render<T: Template>(template: &T) -> Response {
    render_with_status(StatusCode::OK, template)
}

/// Render a template with a non-200 status.
pub(crate) fn render_with_status<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Send a request whose workspace was discarded back to the login page.
pub(crate) fn cancelled_or<F>(err: AppError, otherwise: F) -> Response
where
    F: FnOnce(AppError) -> Response,
{
    if matches!(err, AppError::Cancelled) {
        Redirect::to("/").into_response()
    } else {
        otherwise(err)
    }
}

/// Today's date for records created in a workspace.
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Build every page and form route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(reviews::router())
        .merge(upload::router())
        .merge(configuration::router())
        .merge(users::router())
}

/// Build the complete application with sessions, tracing and static files.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/admin/static"))
        .fallback(not_found)
        .layer(
            // Outermost first: requests are traced before the session loads.
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &axum::http::Request<_>| {
                            tracing::info_span!(
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                                status = tracing::field::Empty,
                                latency_ms = tracing::field::Empty,
                            )
                        })
                        .on_response(
                            |response: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &Span| {
                                span.record("status", response.status().as_u16());
                                span.record(
                                    "latency_ms",
                                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                                );
                                DefaultOnResponse::default().on_response(response, latency, span);
                            },
                        ),
                )
                .layer(session_layer),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Catch-all for unknown paths.
async fn not_found(uri: axum::http::Uri) -> Response {
    render_with_status(
        StatusCode::NOT_FOUND,
        &NotFoundTemplate {
            path: uri.path().to_string(),
        },
    )
}
