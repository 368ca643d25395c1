//! Review browser route handler.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use prifam_core::ReviewId;

use crate::components::{Criteria, ReviewCriteria, ReviewQuery, TableFilter};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::Review;
use crate::state::AppState;

use super::{PageChrome, render};

/// A list row with the link that selects it.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    pub review: Review,
    pub select_href: String,
    pub selected: bool,
}

/// Reviews page template.
#[derive(Template)]
#[template(path = "reviews/index.html")]
pub struct ReviewsTemplate {
    pub chrome: PageChrome,
    pub filter_bar: Vec<TableFilter>,
    pub rows: Vec<ReviewRow>,
    pub total: usize,
    /// Detail panel contents; `None` shows the empty-state placeholder.
    pub selected: Option<Review>,
}

/// Build the reviews router.
pub fn router() -> Router<AppState> {
    Router::new().route("/reviews", get(reviews_page))
}

/// Link to the reviews page keeping the current filters and selecting `id`.
fn select_href(query: &ReviewQuery, id: ReviewId) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in [
        ("search", &query.search),
        ("platform", &query.platform),
        ("sentiment", &query.sentiment),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            params.append_pair(key, value);
        }
    }
    params.append_pair("selected", &id.to_string());
    format!("/reviews?{}", params.finish())
}

/// Filterable review list with a detail panel.
///
/// GET /reviews
#[instrument(skip_all)]
async fn reviews_page(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    Query(query): Query<ReviewQuery>,
) -> Response {
    let criteria = match ReviewCriteria::from_query(&query) {
        Ok(criteria) => criteria,
        Err(e) => return e.into_response(),
    };

    let reference = state.reference();
    // The selection resolves against the full list, so a selected review
    // stays in the detail panel when the filters hide its row.
    let selected = query
        .selected
        .as_deref()
        .and_then(|raw| raw.parse::<ReviewId>().ok())
        .and_then(|id| reference.review(id))
        .cloned();

    let rows = criteria
        .apply(&reference.reviews)
        .into_iter()
        .map(|review| ReviewRow {
            select_href: select_href(&query, review.id),
            selected: selected.as_ref().is_some_and(|s| s.id == review.id),
            review: review.clone(),
        })
        .collect();

    render(&ReviewsTemplate {
        chrome: PageChrome::new(&ctx.admin, "/reviews", None),
        filter_bar: criteria.filters(&reference.review_platforms()),
        rows,
        total: reference.reviews.len(),
        selected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_href_keeps_filters() {
        let query = ReviewQuery {
            search: Some("cold food".to_string()),
            platform: Some(String::new()),
            sentiment: Some("negative".to_string()),
            selected: Some("1".to_string()),
        };
        assert_eq!(
            select_href(&query, ReviewId::new(2)),
            "/reviews?search=cold+food&sentiment=negative&selected=2"
        );
    }
}
