//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use prifam_core::AdminRole;

use crate::services::{ActionKind, AuthError, ClassifierError, UploadError, UserFormError};
use crate::store::StoreError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form input failed validation.
    #[error("{0}")]
    Validation(String),

    /// Malformed query or path parameter.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The same action is already running for this workspace.
    #[error("{0} is already in progress")]
    Busy(ActionKind),

    /// The workspace was discarded while the action was running.
    #[error("The action was cancelled")]
    Cancelled,

    /// Sentiment classification failed.
    #[error("Sentiment analysis failed: {0}")]
    Classifier(#[from] ClassifierError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Busy(_) | Self::Cancelled => StatusCode::CONFLICT,
            Self::Classifier(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show on a page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Classifier(_) => {
                "Sentiment analysis is unavailable right now. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownPlatform(_) => Self::NotFound(err.to_string()),
            StoreError::NoStagedUpload => Self::Validation(UploadError::MissingFile.to_string()),
            StoreError::InvalidSeed(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<UserFormError> for AppError {
    fn from(err: UserFormError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Session(_) | Self::Internal(_) | Self::Classifier(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        (self.status(), self.user_message()).into_response()
    }
}

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(username: &str, role: AdminRole) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
        scope.set_tag("admin.role", role.slug());
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
        scope.remove_tag("admin.role");
    });
}
