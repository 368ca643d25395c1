//! Domain models for the dashboard.
//!
//! Plain, flat records. Nothing here enforces relational integrity beyond
//! what the list filters compare on.

pub mod analysis;
pub mod dashboard;
pub mod platform;
pub mod review;
pub mod session;
pub mod upload;
pub mod user;

pub use analysis::{AnalysisRecord, Classification, ManualReview};
pub use dashboard::{ChartPoint, DashboardSnapshot, StatCard, Trend};
pub use platform::Platform;
pub use review::Review;
pub use session::{CurrentAdmin, keys as session_keys};
pub use upload::{UploadRecord, UploadedFile};
pub use user::{AdminAccount, NewUser, User};
