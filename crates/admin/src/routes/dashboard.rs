//! Dashboard route handlers.

use askama::Template;
use axum::{
    Router,
    extract::State,
    response::Response,
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::components::charts::{self, BarColumn, PieSlice};
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireSuperAdmin, take_flash};
use crate::models::{AdminAccount, DashboardSnapshot, Review, StatCard};
use crate::state::AppState;

use super::{PageChrome, render};

/// Chart series ready for the templates and the chart script.
#[derive(Debug, Clone)]
pub struct DashboardCharts {
    pub monthly: Vec<BarColumn>,
    pub sentiment: Vec<PieSlice>,
    pub platforms: Vec<PieSlice>,
    /// All three series as one JSON object.
    pub json: String,
}

impl DashboardCharts {
    fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        let monthly = charts::bar_columns(&snapshot.monthly_reviews);
        let sentiment = charts::pie_slices(&snapshot.sentiment);
        let platforms = charts::pie_slices(&snapshot.platforms);
        let json = format!(
            r#"{{"monthly":{},"sentiment":{},"platforms":{}}}"#,
            charts::to_json(&monthly),
            charts::to_json(&sentiment),
            charts::to_json(&platforms),
        );
        Self {
            monthly,
            sentiment,
            platforms,
            json,
        }
    }
}

/// Admin dashboard template.
#[derive(Template)]
#[template(path = "dashboard/admin.html")]
pub struct DashboardTemplate {
    pub chrome: PageChrome,
    pub stats: Vec<StatCard>,
    pub charts: DashboardCharts,
    pub recent_reviews: Vec<Review>,
}

/// Super admin dashboard template.
#[derive(Template)]
#[template(path = "dashboard/super_admin.html")]
pub struct SuperAdminTemplate {
    pub chrome: PageChrome,
    pub stats: Vec<StatCard>,
    pub charts: DashboardCharts,
    pub admin_accounts: Vec<AdminAccount>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin_dashboard))
        .route("/super-admin", get(super_admin_dashboard))
        .route("/admin-management", get(super_admin_dashboard))
}

/// Admin dashboard.
///
/// GET /dashboard
#[instrument(skip_all)]
async fn admin_dashboard(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
) -> Response {
    let snapshot = &state.reference().admin_dashboard;
    render(&DashboardTemplate {
        chrome: PageChrome::new(&ctx.admin, "/dashboard", take_flash(&session).await),
        stats: snapshot.stats.clone(),
        charts: DashboardCharts::from_snapshot(snapshot),
        recent_reviews: snapshot.recent_reviews.clone(),
    })
}

/// Super admin dashboard with the admin accounts table.
///
/// GET /super-admin, GET /admin-management
#[instrument(skip_all)]
async fn super_admin_dashboard(
    State(state): State<AppState>,
    RequireSuperAdmin(ctx): RequireSuperAdmin,
    uri: axum::http::Uri,
    session: Session,
) -> Response {
    let snapshot = &state.reference().super_admin_dashboard;
    render(&SuperAdminTemplate {
        chrome: PageChrome::new(&ctx.admin, uri.path(), take_flash(&session).await),
        stats: snapshot.stats.clone(),
        charts: DashboardCharts::from_snapshot(snapshot),
        admin_accounts: state.reference().admin_accounts.clone(),
    })
}
