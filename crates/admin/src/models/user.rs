//! Dashboard user and admin-account domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use prifam_core::{AdminAccountId, AdminRole, Email, UserId, UserStatus};

/// A dashboard user account.
///
/// Emails are not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
    pub status: UserStatus,
    pub created_date: NaiveDate,
    /// `None` until the user first signs in.
    pub last_login: Option<NaiveDate>,
}

/// An organisation-level admin account shown on the super-admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: AdminAccountId,
    pub name: String,
    pub email: Email,
    pub status: UserStatus,
    pub created_date: NaiveDate,
    pub last_login: NaiveDate,
}

/// A validated create-user submission, ready to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub role: AdminRole,
    pub status: UserStatus,
}
