//! Per-session working copy of the reference dataset.

use chrono::NaiveDate;

use prifam_core::{PlatformId, UploadStatus, UserId};

use super::{ReferenceData, StoreError};
use crate::models::{AnalysisRecord, NewUser, Platform, UploadRecord, UploadedFile, User};
use crate::services::actions::{ActionBoard, CancelToken, Cancellation};

/// Mutable state owned by one signed-in session.
#[derive(Debug)]
pub struct Workspace {
    pub platforms: Vec<Platform>,
    pub users: Vec<User>,
    pub upload_history: Vec<UploadRecord>,
    pub staged_upload: Option<UploadedFile>,
    pub last_analysis: Option<AnalysisRecord>,
    pub actions: ActionBoard,
    unsaved_changes: bool,
    cancellation: Cancellation,
}

impl Workspace {
    #[must_use]
    pub fn from_reference(reference: &ReferenceData) -> Self {
        Self {
            platforms: reference.platforms.clone(),
            users: reference.users.clone(),
            upload_history: reference.upload_history.clone(),
            staged_upload: None,
            last_analysis: None,
            actions: ActionBoard::default(),
            unsaved_changes: false,
            cancellation: Cancellation::new(),
        }
    }

    /// Flip a platform's active flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownPlatform`] if `id` is not in the list.
    pub fn toggle_platform(&mut self, id: &PlatformId) -> Result<bool, StoreError> {
        let platform = self
            .platforms
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::UnknownPlatform(id.clone()))?;
        platform.is_active = !platform.is_active;
        self.unsaved_changes = true;
        Ok(platform.is_active)
    }

    /// Restore the platform list to the reference seed.
    pub fn reset_platforms(&mut self, reference: &ReferenceData) {
        self.platforms.clone_from(&reference.platforms);
        self.unsaved_changes = false;
    }

    pub const fn mark_saved(&mut self) {
        self.unsaved_changes = false;
    }

    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    #[must_use]
    pub fn active_platform_count(&self) -> usize {
        self.platforms.iter().filter(|p| p.is_active).count()
    }

    /// Append a user with the next free ID and return that ID.
    pub fn add_user(&mut self, new_user: NewUser, today: NaiveDate) -> UserId {
        let id = self
            .users
            .iter()
            .map(|u| u.id)
            .max()
            .map_or(UserId::new(1), |max| max.next());
        self.users.push(User {
            id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            status: new_user.status,
            created_date: today,
            last_login: None,
        });
        id
    }

    /// Stage a file for processing, replacing any previous one.
    pub fn stage_upload(&mut self, file: UploadedFile) {
        self.staged_upload = Some(file);
    }

    /// Move the staged file into the upload history as "processing".
    ///
    /// Returns the recorded file name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoStagedUpload`] if nothing is staged.
    pub fn record_upload(&mut self, today: NaiveDate) -> Result<String, StoreError> {
        let file = self.staged_upload.take().ok_or(StoreError::NoStagedUpload)?;
        self.upload_history.push(UploadRecord {
            file: file.name.clone(),
            date: today,
            review_count: None,
            status: UploadStatus::Processing,
        });
        Ok(file.name)
    }

    pub fn set_analysis(&mut self, record: AnalysisRecord) {
        self.last_analysis = Some(record);
    }

    pub(crate) fn cancel_token(&self) -> CancelToken {
        self.cancellation.token()
    }

    pub(crate) fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use prifam_core::{AdminRole, Email, UserStatus};

    use super::*;

    fn workspace() -> (ReferenceData, Workspace) {
        let reference = ReferenceData::seeded().unwrap();
        let workspace = Workspace::from_reference(&reference);
        (reference, workspace)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn test_toggle_platform() {
        let (_, mut ws) = workspace();
        assert!(ws.toggle_platform(&PlatformId::from("dunzo")).unwrap());
        assert!(ws.has_unsaved_changes());
        assert_eq!(ws.active_platform_count(), 4);
        assert!(!ws.toggle_platform(&PlatformId::from("dunzo")).unwrap());
    }

    #[test]
    fn test_toggle_unknown_platform() {
        let (_, mut ws) = workspace();
        let err = ws.toggle_platform(&PlatformId::from("deliveroo")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownPlatform(_)));
        assert!(!ws.has_unsaved_changes());
    }

    #[test]
    fn test_reset_restores_seed_after_any_toggles() {
        let (reference, mut ws) = workspace();
        for id in ["zomato", "swiggy", "bigbasket", "amazon-fresh", "zomato"] {
            ws.toggle_platform(&PlatformId::from(id)).unwrap();
        }
        ws.reset_platforms(&reference);
        assert_eq!(ws.platforms, reference.platforms);
        assert_eq!(ws.platforms.len(), 8);
        assert!(!ws.has_unsaved_changes());
    }

    #[test]
    fn test_mark_saved_keeps_changes() {
        let (_, mut ws) = workspace();
        ws.toggle_platform(&PlatformId::from("grofers")).unwrap();
        ws.mark_saved();
        assert!(!ws.has_unsaved_changes());
        assert_eq!(ws.active_platform_count(), 4);
    }

    #[test]
    fn test_add_user_assigns_next_id() {
        let (_, mut ws) = workspace();
        let id = ws.add_user(
            NewUser {
                name: "Nina Rao".to_string(),
                email: Email::parse("nina.rao@company.com").unwrap(),
                role: AdminRole::Agent,
                status: UserStatus::Active,
            },
            today(),
        );
        assert_eq!(id, UserId::new(6));
        let user = ws.users.last().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.last_login, None);
        assert_eq!(user.created_date, today());
        assert_eq!(ws.users.len(), 6);
    }

    #[test]
    fn test_record_upload() {
        let (_, mut ws) = workspace();
        assert!(matches!(
            ws.record_upload(today()),
            Err(StoreError::NoStagedUpload)
        ));

        ws.stage_upload(UploadedFile {
            name: "feb.csv".to_string(),
            size_bytes: 2048,
            content_type: Some("text/csv".to_string()),
        });
        assert_eq!(ws.record_upload(today()).unwrap(), "feb.csv");
        let record = ws.upload_history.last().unwrap();
        assert_eq!(record.file, "feb.csv");
        assert_eq!(record.review_count, None);
        assert_eq!(record.status, UploadStatus::Processing);
        assert!(ws.staged_upload.is_none());
        assert_eq!(ws.upload_history.len(), 4);
    }
}
