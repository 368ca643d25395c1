//! Site configuration route handlers.
//!
//! Platform toggles apply to the session workspace immediately; "save" only
//! clears the unsaved-changes marker after the simulated delay.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use prifam_core::PlatformId;

use crate::components::{
    CategoryGroup, Criteria, PlatformCriteria, PlatformQuery, distinct_categories,
    group_by_category,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, set_flash, take_flash};
use crate::models::Platform;
use crate::services::{ActionKind, perform};
use crate::state::AppState;

use super::{PageChrome, cancelled_or, render, render_with_status};

/// Overview numbers above the platform list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformStats {
    pub active: usize,
    pub total: usize,
    pub categories: usize,
}

impl PlatformStats {
    fn of(platforms: &[Platform]) -> Self {
        Self {
            active: platforms.iter().filter(|p| p.is_active).count(),
            total: platforms.len(),
            categories: distinct_categories(platforms).len(),
        }
    }
}

/// Configuration page template.
#[derive(Template)]
#[template(path = "configuration/index.html")]
pub struct ConfigurationTemplate<'a> {
    pub chrome: PageChrome,
    pub search: String,
    pub groups: Vec<CategoryGroup<'a>>,
    pub stats: PlatformStats,
    pub unsaved_changes: bool,
    pub saving: bool,
    pub error: Option<String>,
}

/// Build the configuration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/configuration", get(configuration_page))
        .route("/settings", get(configuration_page))
        .route(
            "/configuration/platforms/{id}/toggle",
            post(toggle_platform),
        )
        .route("/configuration/save", post(save_configuration))
        .route("/configuration/reset", post(reset_configuration))
}

/// Current workspace platforms plus whether a save is outstanding or running.
fn snapshot(ctx: &AdminContext) -> (Vec<Platform>, bool, bool) {
    let workspace = ctx.workspace.lock();
    (
        workspace.platforms.clone(),
        workspace.has_unsaved_changes(),
        workspace.actions.is_pending(ActionKind::SaveConfiguration),
    )
}

fn configuration_response(
    ctx: &AdminContext,
    path: &str,
    query: &PlatformQuery,
    flash: Option<String>,
    error: Option<&AppError>,
) -> Response {
    let criteria = PlatformCriteria::from_query(query);
    let (platforms, unsaved_changes, saving) = snapshot(ctx);
    let visible = criteria.apply(&platforms);
    let page = ConfigurationTemplate {
        chrome: PageChrome::new(&ctx.admin, path, flash),
        search: criteria.search.as_str().to_string(),
        groups: group_by_category(&platforms, &visible),
        stats: PlatformStats::of(&platforms),
        unsaved_changes,
        saving,
        error: error.map(AppError::user_message),
    };
    match error {
        Some(err) => render_with_status(err.status(), &page),
        None => render(&page),
    }
}

/// Link back to the configuration page keeping the search.
fn configuration_href(query: &PlatformQuery) -> String {
    match query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(search) => {
            let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("search", search)
                .finish();
            format!("/configuration?{encoded}")
        }
        None => "/configuration".to_string(),
    }
}

/// Platform list grouped by category.
///
/// GET /configuration, GET /settings
#[instrument(skip_all)]
async fn configuration_page(
    RequireAdminAuth(ctx): RequireAdminAuth,
    uri: Uri,
    session: Session,
    Query(query): Query<PlatformQuery>,
) -> Response {
    let flash = take_flash(&session).await;
    configuration_response(&ctx, uri.path(), &query, flash, None)
}

/// Flip one platform's active flag.
///
/// POST /configuration/platforms/{id}/toggle
#[instrument(skip_all, fields(platform = %id))]
async fn toggle_platform(
    RequireAdminAuth(ctx): RequireAdminAuth,
    Path(id): Path<String>,
    Form(form): Form<PlatformQuery>,
) -> Response {
    let id = PlatformId::new(id);
    let toggled = ctx.workspace.lock().toggle_platform(&id);
    match toggled {
        Ok(is_active) => {
            tracing::debug!(platform = %id, is_active, "Platform toggled");
            Redirect::to(&configuration_href(&form)).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Save the platform configuration.
///
/// POST /configuration/save
#[instrument(skip_all)]
async fn save_configuration(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
) -> Response {
    let saved = perform(
        &ctx.workspace,
        ActionKind::SaveConfiguration,
        state.config().latency.save_configuration,
        async { Ok(()) },
        |ws, ()| {
            ws.mark_saved();
            Ok(ws.active_platform_count())
        },
    )
    .await;

    match saved {
        Ok(active) => {
            tracing::info!(active, "Configuration saved");
            let message = format!("Configuration saved. {active} platforms active.");
            if let Err(e) = set_flash(&session, &message).await {
                return AppError::from(e).into_response();
            }
            Redirect::to("/configuration").into_response()
        }
        Err(e) => cancelled_or(e, |e| {
            configuration_response(&ctx, "/configuration", &PlatformQuery::default(), None, Some(&e))
        }),
    }
}

/// Restore the default platform list.
///
/// POST /configuration/reset
#[instrument(skip_all)]
async fn reset_configuration(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
) -> Response {
    ctx.workspace.lock().reset_platforms(state.reference());
    tracing::info!("Configuration reset to defaults");

    if let Err(e) = set_flash(&session, "Configuration reset to defaults.").await {
        return AppError::from(e).into_response();
    }
    Redirect::to("/configuration").into_response()
}
