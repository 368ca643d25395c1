//! Bulk-upload domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use prifam_core::UploadStatus;

/// A file accepted by the bulk-upload form.
///
/// Only the metadata is kept; the content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

impl UploadedFile {
    /// Size in kilobytes with one decimal ("12.5").
    #[must_use]
    pub fn size_kb(&self) -> String {
        #[allow(clippy::cast_precision_loss)] // upload sizes are capped far below 2^52
        let kb = self.size_bytes as f64 / 1024.0;
        format!("{kb:.1}")
    }
}

/// An entry in the recent-uploads history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub file: String,
    pub date: NaiveDate,
    /// Unknown until the file has been processed.
    pub review_count: Option<u32>,
    pub status: UploadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_kb() {
        let file = UploadedFile {
            name: "reviews.csv".to_string(),
            size_bytes: 12_800,
            content_type: None,
        };
        assert_eq!(file.size_kb(), "12.5");
    }
}
