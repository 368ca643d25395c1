//! Dashboard snapshot types.

use serde::{Deserialize, Serialize};

use super::Review;

/// Direction of a stat card's change indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// CSS modifier for the change indicator.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Up => "trend-up",
            Self::Down => "trend-down",
        }
    }
}

/// A headline metric tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    /// Change versus the previous period ("+12.5%").
    pub change: String,
    pub trend: Trend,
}

impl StatCard {
    #[must_use]
    pub fn up(title: &str, value: &str, change: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            change: change.to_string(),
            trend: Trend::Up,
        }
    }
}

/// A labelled value as fed to the chart adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

impl ChartPoint {
    #[must_use]
    pub fn new(label: &str, value: u64) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// Everything a dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: Vec<StatCard>,
    /// Reviews received per month.
    pub monthly_reviews: Vec<ChartPoint>,
    /// Review counts per sentiment, labelled by sentiment title.
    pub sentiment: Vec<ChartPoint>,
    /// Review counts per platform.
    pub platforms: Vec<ChartPoint>,
    pub recent_reviews: Vec<Review>,
}
