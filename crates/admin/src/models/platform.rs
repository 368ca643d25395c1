//! Review platform (ingestion source) domain type.

use serde::{Deserialize, Serialize};

use prifam_core::PlatformId;

/// An external review source that can be enabled or disabled for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    /// Grouping shown on the configuration page ("Food Delivery", "Grocery").
    pub category: String,
    pub icon: String,
}
