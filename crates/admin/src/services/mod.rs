//! Business logic services for admin.
//!
//! # Services
//!
//! - `actions` - Simulated-latency action runner with busy flags and cancellation
//! - `auth` - Login stub and role-based landing routes
//! - `classifier` - Review sentiment classification (keyword or remote)
//! - `upload` - Bulk-upload acceptance rules
//! - `users` - Create-user form validation

pub mod actions;
pub mod auth;
pub mod classifier;
pub mod upload;
pub mod users;

pub use actions::{ActionBoard, ActionKind, ActionState, perform};
pub use auth::{AuthError, LoginForm, LoginGate, LoginOutcome, authenticate, landing_for};
pub use classifier::{ClassifierError, KeywordClassifier, RemoteClassifier, SentimentClassifier};
pub use upload::{MAX_UPLOAD_BYTES, UploadError};
pub use users::{CreateUserForm, UserFormError, validate_new_user};
