//! Criteria for the reviews, users and configuration list views.

use serde::Deserialize;

use prifam_core::{AdminRole, Sentiment, UserStatus};

use super::list_filter::{Choice, Criteria, FilterOption, TableFilter, TextQuery};
use crate::error::AppError;
use crate::models::{Platform, Review, User};

fn bad_filter(err: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(err.to_string())
}

// =============================================================================
// Reviews
// =============================================================================

/// Query string of the reviews page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewQuery {
    pub search: Option<String>,
    pub platform: Option<String>,
    pub sentiment: Option<String>,
    /// ID of the review shown in the detail panel.
    pub selected: Option<String>,
}

/// Search over text, customer and platform, plus platform and sentiment
/// equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewCriteria {
    pub search: TextQuery,
    pub platform: Choice<String>,
    pub sentiment: Choice<Sentiment>,
}

impl ReviewCriteria {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for an unknown sentiment.
    pub fn from_query(query: &ReviewQuery) -> Result<Self, AppError> {
        Ok(Self {
            search: TextQuery::new(query.search.as_deref()),
            platform: Choice::parse(query.platform.as_deref()).map_err(bad_filter)?,
            sentiment: Choice::parse(query.sentiment.as_deref()).map_err(bad_filter)?,
        })
    }

    /// Filter bar controls; `platforms` lists the platform options.
    #[must_use]
    pub fn filters(&self, platforms: &[&str]) -> Vec<TableFilter> {
        vec![
            TableFilter::text("search", "Search", "Search reviews...", &self.search),
            TableFilter::select(
                "platform",
                "Platform",
                "All Platforms",
                platforms.iter().map(|p| FilterOption::new(p, p)).collect(),
                self.platform.token(),
            ),
            TableFilter::select(
                "sentiment",
                "Sentiment",
                "All Sentiments",
                Sentiment::ALL
                    .iter()
                    .map(|s| FilterOption::new(s.as_str(), s.title()))
                    .collect(),
                self.sentiment.token(),
            ),
        ]
    }
}

impl Criteria<Review> for ReviewCriteria {
    fn matches(&self, review: &Review) -> bool {
        let fields = [
            review.text.as_str(),
            review.customer.as_str(),
            review.platform.as_str(),
        ];
        self.search.matches_any(&fields)
            && self
                .platform
                .allows(|p| p.eq_ignore_ascii_case(&review.platform))
            && self.sentiment.matches(&review.sentiment)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Query string of the user-management page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Search over name and email, plus role and status equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCriteria {
    pub search: TextQuery,
    pub role: Choice<AdminRole>,
    pub status: Choice<UserStatus>,
}

impl UserCriteria {
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for an unknown role or status.
    pub fn from_query(query: &UserQuery) -> Result<Self, AppError> {
        Ok(Self {
            search: TextQuery::new(query.search.as_deref()),
            role: Choice::parse(query.role.as_deref()).map_err(bad_filter)?,
            status: Choice::parse(query.status.as_deref()).map_err(bad_filter)?,
        })
    }

    #[must_use]
    pub fn filters(&self) -> Vec<TableFilter> {
        vec![
            TableFilter::text("search", "Search", "Search users...", &self.search),
            TableFilter::select(
                "role",
                "Role",
                "All Roles",
                AdminRole::ALL
                    .iter()
                    .map(|r| FilterOption::new(r.slug(), r.title()))
                    .collect(),
                self.role.token(),
            ),
            TableFilter::select(
                "status",
                "Status",
                "All Status",
                vec![
                    FilterOption::new("active", "Active"),
                    FilterOption::new("inactive", "Inactive"),
                ],
                self.status.token(),
            ),
        ]
    }
}

impl Criteria<User> for UserCriteria {
    fn matches(&self, user: &User) -> bool {
        self.search.matches_any(&[user.name.as_str(), user.email.as_str()])
            && self.role.matches(&user.role)
            && self.status.matches(&user.status)
    }
}

// =============================================================================
// Platforms
// =============================================================================

/// Query string of the configuration page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformQuery {
    pub search: Option<String>,
}

/// Search over name, description and category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformCriteria {
    pub search: TextQuery,
}

impl PlatformCriteria {
    #[must_use]
    pub fn from_query(query: &PlatformQuery) -> Self {
        Self {
            search: TextQuery::new(query.search.as_deref()),
        }
    }
}

impl Criteria<Platform> for PlatformCriteria {
    fn matches(&self, platform: &Platform) -> bool {
        self.search.matches_any(&[
            platform.name.as_str(),
            platform.description.as_str(),
            platform.category.as_str(),
        ])
    }
}

/// Visible platforms of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub platforms: Vec<&'a Platform>,
}

/// Group `visible` by category.
///
/// Categories appear in first-seen order of `all`; categories with no
/// visible platform are left out.
#[must_use]
pub fn group_by_category<'a>(
    all: &'a [Platform],
    visible: &[&'a Platform],
) -> Vec<CategoryGroup<'a>> {
    distinct_categories(all)
        .into_iter()
        .filter_map(|category| {
            let platforms: Vec<&Platform> = visible
                .iter()
                .copied()
                .filter(|p| p.category == category)
                .collect();
            (!platforms.is_empty()).then_some(CategoryGroup {
                category,
                platforms,
            })
        })
        .collect()
}

/// Distinct categories in first-seen order.
#[must_use]
pub fn distinct_categories(platforms: &[Platform]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for platform in platforms {
        if !categories.contains(&platform.category.as_str()) {
            categories.push(&platform.category);
        }
    }
    categories
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use prifam_core::{ReviewId, UserId};

    use super::*;
    use crate::store::ReferenceData;

    fn seed() -> ReferenceData {
        ReferenceData::seeded().unwrap()
    }

    fn review_ids(criteria: &ReviewCriteria, reviews: &[Review]) -> Vec<ReviewId> {
        criteria.apply(reviews).into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_no_criteria_shows_everything() {
        let data = seed();
        let criteria = ReviewCriteria::from_query(&ReviewQuery::default()).unwrap();
        assert_eq!(criteria.apply(&data.reviews).len(), 5);
    }

    #[test]
    fn test_search_swiggy_and_negative_yields_review_two() {
        let data = seed();
        let criteria = ReviewCriteria::from_query(&ReviewQuery {
            search: Some("swiggy".to_string()),
            sentiment: Some("negative".to_string()),
            ..ReviewQuery::default()
        })
        .unwrap();
        assert_eq!(review_ids(&criteria, &data.reviews), [ReviewId::new(2)]);
    }

    #[test]
    fn test_review_search_covers_customer() {
        let data = seed();
        let criteria = ReviewCriteria::from_query(&ReviewQuery {
            search: Some("SNEHA".to_string()),
            ..ReviewQuery::default()
        })
        .unwrap();
        assert_eq!(review_ids(&criteria, &data.reviews), [ReviewId::new(4)]);
    }

    #[test]
    fn test_platform_filter_keeps_order() {
        let data = seed();
        let criteria = ReviewCriteria::from_query(&ReviewQuery {
            platform: Some("Zomato".to_string()),
            ..ReviewQuery::default()
        })
        .unwrap();
        assert_eq!(
            review_ids(&criteria, &data.reviews),
            [ReviewId::new(1), ReviewId::new(3)]
        );
    }

    #[test]
    fn test_every_combination_is_the_and_of_its_predicates() {
        let data = seed();
        let searches = [None, Some("food"), Some("swiggy"), Some("zzz")];
        let platforms = [None, Some("Zomato"), Some("Swiggy"), Some("BlinkIT")];
        let sentiments = [None, Some("positive"), Some("neutral"), Some("negative")];

        for search in searches {
            for platform in platforms {
                for sentiment in sentiments {
                    let criteria = ReviewCriteria::from_query(&ReviewQuery {
                        search: search.map(str::to_string),
                        platform: platform.map(str::to_string),
                        sentiment: sentiment.map(str::to_string),
                        selected: None,
                    })
                    .unwrap();
                    let expected: Vec<ReviewId> = data
                        .reviews
                        .iter()
                        .filter(|r| {
                            search.is_none_or(|s| {
                                [&r.text, &r.customer, &r.platform]
                                    .iter()
                                    .any(|f| f.to_lowercase().contains(s))
                            }) && platform.is_none_or(|p| r.platform == p)
                                && sentiment.is_none_or(|s| r.sentiment.as_str() == s)
                        })
                        .map(|r| r.id)
                        .collect();
                    assert_eq!(review_ids(&criteria, &data.reviews), expected);
                }
            }
        }
    }

    #[test]
    fn test_unknown_sentiment_is_bad_request() {
        let err = ReviewCriteria::from_query(&ReviewQuery {
            sentiment: Some("furious".to_string()),
            ..ReviewQuery::default()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_review_filters_echo_selection() {
        let criteria = ReviewCriteria::from_query(&ReviewQuery {
            sentiment: Some("Neutral".to_string()),
            ..ReviewQuery::default()
        })
        .unwrap();
        let filters = criteria.filters(&["Zomato", "Swiggy", "BlinkIT"]);
        assert_eq!(filters[1].value, "all");
        assert_eq!(filters[2].value, "neutral");
        assert_eq!(filters[1].options.len(), 4);
    }

    #[test]
    fn test_user_role_and_status() {
        let data = seed();
        let criteria = UserCriteria::from_query(&UserQuery {
            role: Some("admin".to_string()),
            status: Some("active".to_string()),
            ..UserQuery::default()
        })
        .unwrap();
        let ids: Vec<UserId> = criteria.apply(&data.users).iter().map(|u| u.id).collect();
        assert_eq!(ids, [UserId::new(1), UserId::new(5)]);
    }

    #[test]
    fn test_user_search_covers_email() {
        let data = seed();
        let criteria = UserCriteria::from_query(&UserQuery {
            search: Some("mike.wilson@".to_string()),
            ..UserQuery::default()
        })
        .unwrap();
        assert_eq!(criteria.apply(&data.users).len(), 1);
    }

    #[test]
    fn test_user_role_accepts_title() {
        let criteria = UserCriteria::from_query(&UserQuery {
            role: Some("Super Admin".to_string()),
            ..UserQuery::default()
        })
        .unwrap();
        assert_eq!(criteria.role, Choice::Only(AdminRole::SuperAdmin));
    }

    #[test]
    fn test_platform_grouping_first_seen_order() {
        let data = seed();
        let criteria = PlatformCriteria::default();
        let visible = criteria.apply(&data.platforms);
        let groups = group_by_category(&data.platforms, &visible);
        let names: Vec<&str> = groups.iter().map(|g| g.category).collect();
        assert_eq!(names, ["Food Delivery", "Grocery", "Delivery"]);
        assert_eq!(groups[1].platforms.len(), 4);
    }

    #[test]
    fn test_platform_grouping_skips_empty_groups() {
        let data = seed();
        let criteria = PlatformCriteria::from_query(&PlatformQuery {
            search: Some("hyperlocal".to_string()),
        });
        let visible = criteria.apply(&data.platforms);
        let groups = group_by_category(&data.platforms, &visible);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Delivery");
        assert_eq!(groups[0].platforms[0].name, "Dunzo");
    }

    #[test]
    fn test_platform_search_covers_category() {
        let data = seed();
        let criteria = PlatformCriteria::from_query(&PlatformQuery {
            search: Some("grocery".to_string()),
        });
        assert_eq!(criteria.apply(&data.platforms).len(), 4);
    }

    #[test]
    fn test_distinct_categories() {
        let data = seed();
        assert_eq!(distinct_categories(&data.platforms).len(), 3);
    }
}
