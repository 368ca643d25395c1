//! In-memory data store for the admin dashboard.
//!
//! # Layout
//!
//! - [`ReferenceData`] - the seed dataset, built once and never mutated
//! - [`Workspace`] - a per-session working copy cloned from the reference
//! - [`WorkspaceRegistry`] - maps session workspace IDs to live workspaces
//!
//! Nothing is persisted. Restarting the server or logging out discards every
//! change made in a workspace. Workspaces nobody uses are evicted by
//! [`WorkspaceRegistry::evict_expired`], which the server runs periodically.

pub mod seed;
pub mod workspace;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use prifam_core::{EmailError, PlatformId};

pub use seed::ReferenceData;
pub use workspace::Workspace;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A built-in seed record failed validation.
    #[error("invalid seed data: {0}")]
    InvalidSeed(#[from] EmailError),

    /// No platform with this ID exists in the workspace.
    #[error("unknown platform: {0}")]
    UnknownPlatform(PlatformId),

    /// Processing was requested before a file was staged.
    #[error("no file has been uploaded")]
    NoStagedUpload,
}

/// Identifier of a session's workspace, stored in the session cookie data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(Uuid);

impl WorkspaceId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared handle to one workspace.
///
/// The lock is a plain `std` mutex: every critical section is a short
/// synchronous read or update and is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct WorkspaceHandle(Arc<Mutex<Workspace>>);

impl WorkspaceHandle {
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self(Arc::new(Mutex::new(workspace)))
    }

    /// Lock the workspace.
    ///
    /// A panic while the lock was held leaves plain data behind, so a
    /// poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, Workspace> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How long a new workspace may wait for the first request that uses it.
///
/// Sign-in redirects straight to a page, so only clients that drop the
/// session cookie leave a workspace unclaimed this long.
pub const UNCLAIMED_WORKSPACE_GRACE: Duration = Duration::from_secs(10 * 60);

/// When [`WorkspaceRegistry::evict_expired`] drops a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Inactivity after which a workspace in use is dropped.
    pub idle: Duration,
    /// Age at which a workspace no request has used yet is dropped.
    pub unclaimed: Duration,
}

#[derive(Debug)]
struct Slot {
    handle: WorkspaceHandle,
    last_seen: Instant,
    claimed: bool,
}

impl Slot {
    fn is_expired(&self, now: Instant, policy: EvictionPolicy) -> bool {
        let limit = if self.claimed {
            policy.idle
        } else {
            policy.unclaimed
        };
        now.saturating_duration_since(self.last_seen) >= limit
    }
}

/// Registry of live workspaces keyed by [`WorkspaceId`].
#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    workspaces: RwLock<HashMap<WorkspaceId, Slot>>,
}

impl WorkspaceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone the reference dataset into a fresh workspace and register it.
    ///
    /// The workspace counts as unclaimed until the first [`get`](Self::get).
    pub async fn create(&self, reference: &ReferenceData) -> (WorkspaceId, WorkspaceHandle) {
        let id = WorkspaceId::new();
        let handle = WorkspaceHandle::new(Workspace::from_reference(reference));
        let slot = Slot {
            handle: handle.clone(),
            last_seen: Instant::now(),
            claimed: false,
        };
        self.workspaces.write().await.insert(id, slot);
        tracing::debug!(workspace = %id, "Workspace created");
        (id, handle)
    }

    /// Look up a workspace and mark it as used now.
    pub async fn get(&self, id: WorkspaceId) -> Option<WorkspaceHandle> {
        let mut workspaces = self.workspaces.write().await;
        let slot = workspaces.get_mut(&id)?;
        slot.last_seen = Instant::now();
        slot.claimed = true;
        Some(slot.handle.clone())
    }

    /// Remove a workspace and cancel its in-flight actions.
    ///
    /// Returns `false` if no workspace was registered under `id`.
    pub async fn discard(&self, id: WorkspaceId) -> bool {
        let removed = self.workspaces.write().await.remove(&id);
        match removed {
            Some(slot) => {
                slot.handle.lock().cancel();
                tracing::debug!(workspace = %id, "Workspace discarded");
                true
            }
            None => false,
        }
    }

    /// Drop every workspace that has expired under `policy`, cancelling its
    /// in-flight actions. Returns how many were removed.
    pub async fn evict_expired(&self, policy: EvictionPolicy) -> usize {
        let now = Instant::now();
        let mut workspaces = self.workspaces.write().await;
        let before = workspaces.len();
        workspaces.retain(|id, slot| {
            if slot.is_expired(now, policy) {
                slot.handle.lock().cancel();
                tracing::debug!(workspace = %id, claimed = slot.claimed, "Workspace evicted");
                false
            } else {
                true
            }
        });
        before - workspaces.len()
    }

    pub async fn len(&self) -> usize {
        self.workspaces.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workspaces.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_discard() {
        let reference = ReferenceData::seeded().unwrap();
        let registry = WorkspaceRegistry::new();

        let (id, handle) = registry.create(&reference).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(id).await.is_some());

        assert!(registry.discard(id).await);
        assert!(registry.get(id).await.is_none());
        assert!(registry.is_empty().await);
        assert!(handle.lock().is_cancelled());

        assert!(!registry.discard(id).await);
    }

    #[tokio::test]
    async fn test_workspaces_are_isolated() {
        let reference = ReferenceData::seeded().unwrap();
        let registry = WorkspaceRegistry::new();

        let (_, first) = registry.create(&reference).await;
        let (_, second) = registry.create(&reference).await;

        first
            .lock()
            .toggle_platform(&PlatformId::from("zomato"))
            .unwrap();

        assert_ne!(first.lock().platforms, second.lock().platforms);
        assert_eq!(second.lock().platforms, reference.platforms);
    }

    #[test]
    fn test_workspace_id_serializes_as_uuid() {
        let id = WorkspaceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    const POLICY: EvictionPolicy = EvictionPolicy {
        idle: Duration::from_secs(24 * 60 * 60),
        unclaimed: UNCLAIMED_WORKSPACE_GRACE,
    };

    #[tokio::test(start_paused = true)]
    async fn test_unclaimed_workspace_evicted_after_grace() {
        let reference = ReferenceData::seeded().unwrap();
        let registry = WorkspaceRegistry::new();
        let (_, handle) = registry.create(&reference).await;

        tokio::time::advance(UNCLAIMED_WORKSPACE_GRACE - Duration::from_secs(1)).await;
        assert_eq!(registry.evict_expired(POLICY).await, 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(registry.evict_expired(POLICY).await, 1);
        assert!(registry.is_empty().await);
        assert!(handle.lock().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_used_workspace_kept_until_idle() {
        let reference = ReferenceData::seeded().unwrap();
        let registry = WorkspaceRegistry::new();
        let (id, _) = registry.create(&reference).await;
        assert!(registry.get(id).await.is_some());

        tokio::time::advance(UNCLAIMED_WORKSPACE_GRACE * 3).await;
        assert_eq!(registry.evict_expired(POLICY).await, 0);

        // Each use pushes the deadline back.
        assert!(registry.get(id).await.is_some());
        tokio::time::advance(POLICY.idle - Duration::from_secs(1)).await;
        assert_eq!(registry.evict_expired(POLICY).await, 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(registry.evict_expired(POLICY).await, 1);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_only_touches_expired_workspaces() {
        let reference = ReferenceData::seeded().unwrap();
        let registry = WorkspaceRegistry::new();
        let (abandoned, _) = registry.create(&reference).await;

        tokio::time::advance(UNCLAIMED_WORKSPACE_GRACE).await;
        let (fresh, _) = registry.create(&reference).await;

        assert_eq!(registry.evict_expired(POLICY).await, 1);
        assert!(registry.get(abandoned).await.is_none());
        assert!(registry.get(fresh).await.is_some());
    }
}
