//! Create-user form validation.

use serde::Deserialize;
use thiserror::Error;

use prifam_core::{AdminRole, Email, EmailError, UserStatus};

use crate::models::NewUser;

/// Minimum password length for new users.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Create-user form submission.
///
/// `active` is an HTML checkbox: present when ticked, absent otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub active: Option<String>,
}

/// Errors from the create-user form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserFormError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please enter a valid email address ({0}).")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must be at least 8 characters.")]
    WeakPassword,

    #[error("Please choose a valid role.")]
    InvalidRole,
}

/// Validate a create-user submission.
///
/// # Errors
///
/// Returns [`UserFormError::MissingFields`] if any required field is empty,
/// otherwise the first email, password or role problem found.
pub fn validate_new_user(form: &CreateUserForm) -> Result<NewUser, UserFormError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let role = form.role.trim();
    if name.is_empty() || email.is_empty() || form.password.is_empty() || role.is_empty() {
        return Err(UserFormError::MissingFields);
    }

    let email = Email::parse(email)?;

    if form.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserFormError::WeakPassword);
    }

    let role = role
        .parse::<AdminRole>()
        .ok()
        .filter(|r| AdminRole::ASSIGNABLE.contains(r))
        .ok_or(UserFormError::InvalidRole)?;

    Ok(NewUser {
        name: name.to_string(),
        email,
        role,
        status: UserStatus::from_active(form.active.is_some()),
    })
}
