//! Customer review domain type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use prifam_core::{ReviewId, Sentiment};

/// A customer review pulled from a delivery platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub text: String,
    /// Source platform name (the review's category).
    pub platform: String,
    /// Star rating, 1-5.
    pub rating: u8,
    pub sentiment: Sentiment,
    pub suggested_response: String,
    pub date: NaiveDate,
    pub customer: String,
}

impl Review {
    /// Rating rendered as five filled/empty stars.
    #[must_use]
    pub fn stars(&self) -> String {
        star_string(self.rating)
    }
}

/// Render a 0-5 rating as a fixed-width star string.
#[must_use]
pub fn star_string(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_string() {
        assert_eq!(star_string(0), "☆☆☆☆☆");
        assert_eq!(star_string(4), "★★★★☆");
        assert_eq!(star_string(9), "★★★★★");
    }
}
