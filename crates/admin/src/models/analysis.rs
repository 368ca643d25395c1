//! Sentiment-analysis domain types.

use serde::{Deserialize, Serialize};

use prifam_core::Sentiment;

/// Classifier verdict for a piece of review text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    /// Confidence in percent, 0-100.
    pub confidence: u8,
    pub suggested_response: String,
}

/// A review typed into the manual-entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualReview {
    /// Customer name or email, optional.
    pub customer: String,
    pub text: String,
    /// Platform picked from the select box, empty when none was chosen.
    pub platform: String,
    /// 0 when no star was clicked.
    pub rating: u8,
}

/// The last analysis run on a workspace, input and verdict together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub input: ManualReview,
    pub result: Classification,
}
