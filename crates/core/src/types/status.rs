//! Label and status enums for reviews, users and uploads.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a label does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Sentiment label attached to a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All sentiments in display order.
    pub const ALL: [Self; 3] = [Self::Positive, Self::Neutral, Self::Negative];

    /// Lowercase label used in URLs and badges.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Capitalised label used in select boxes and chart legends.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(ParseLabelError::new("sentiment", s)),
        }
    }
}

/// Access-level tag for dashboard users.
///
/// Only `SuperAdmin` changes what the dashboard shows; every other role
/// receives the standard admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin-account management.
    SuperAdmin,
    /// Can manage reviews, upload data, and configure settings.
    Admin,
    /// Can view and respond to reviews, limited settings access.
    Agent,
    /// Read-only access to dashboards and reports.
    Viewer,
}

impl AdminRole {
    /// All roles in display order.
    pub const ALL: [Self; 4] = [Self::SuperAdmin, Self::Admin, Self::Agent, Self::Viewer];

    /// Roles that can be granted from the create-user form.
    pub const ASSIGNABLE: [Self; 3] = [Self::Admin, Self::Agent, Self::Viewer];

    /// Human-readable label ("Super Admin").
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Admin => "Admin",
            Self::Agent => "Agent",
            Self::Viewer => "Viewer",
        }
    }

    /// URL-safe slug ("super-admin").
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::Agent => "agent",
            Self::Viewer => "viewer",
        }
    }

    /// Short description shown on the create-user page.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Manages admin accounts across the whole organisation",
            Self::Admin => "Can manage reviews, upload data, and configure settings",
            Self::Agent => "Can view and respond to reviews, limited settings access",
            Self::Viewer => "Read-only access to dashboards and reports",
        }
    }

    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for AdminRole {
    type Err = ParseLabelError;

    /// Accepts the title, the slug, or the `snake_case` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        Self::ALL
            .into_iter()
            .find(|role| role.slug() == normalized)
            .ok_or_else(|| ParseLabelError::new("role", s))
    }
}

/// Account status of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub const fn from_active(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseLabelError::new("status", s)),
        }
    }
}

/// Processing state of a bulk review upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Processing,
    Completed,
}

impl UploadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
