//! Application state shared across handlers.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::AdminConfig;
use crate::error::AppError;
use crate::middleware::SESSION_IDLE_TIMEOUT;
use crate::services::{KeywordClassifier, LoginGate, RemoteClassifier, SentimentClassifier};
use crate::store::{
    EvictionPolicy, ReferenceData, UNCLAIMED_WORKSPACE_GRACE, WorkspaceHandle, WorkspaceId,
    WorkspaceRegistry,
};

/// How often the background sweep looks for expired workspaces.
pub const WORKSPACE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Workspaces live exactly as long as the session that owns them.
pub const WORKSPACE_EVICTION: EvictionPolicy = EvictionPolicy {
    idle: SESSION_IDLE_TIMEOUT,
    unclaimed: UNCLAIMED_WORKSPACE_GRACE,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    reference: ReferenceData,
    workspaces: WorkspaceRegistry,
    logins: LoginGate,
    classifier: Box<dyn SentimentClassifier>,
}

impl AppState {
    /// Build state with the built-in seed data.
    ///
    /// Uses the remote classifier when one is configured, the keyword
    /// classifier otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed data is invalid or the remote classifier
    /// client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, AppError> {
        let classifier: Box<dyn SentimentClassifier> = match &config.classifier {
            Some(remote) => Box::new(RemoteClassifier::new(remote)?),
            None => Box::new(KeywordClassifier),
        };
        let reference = ReferenceData::seeded()?;
        Ok(Self::with_parts(config, reference, classifier))
    }

    #[must_use]
    pub fn with_parts(
        config: AdminConfig,
        reference: ReferenceData,
        classifier: Box<dyn SentimentClassifier>,
    ) -> Self {
        tracing::info!(classifier = classifier.name(), "Admin state initialized");
        Self {
            inner: Arc::new(AppStateInner {
                config,
                reference,
                workspaces: WorkspaceRegistry::new(),
                logins: LoginGate::new(),
                classifier,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.inner.reference
    }

    #[must_use]
    pub fn workspaces(&self) -> &WorkspaceRegistry {
        &self.inner.workspaces
    }

    #[must_use]
    pub fn logins(&self) -> &LoginGate {
        &self.inner.logins
    }

    #[must_use]
    pub fn classifier(&self) -> &dyn SentimentClassifier {
        self.inner.classifier.as_ref()
    }

    /// Clone the reference data into a new workspace.
    pub async fn open_workspace(&self) -> (WorkspaceId, WorkspaceHandle) {
        self.inner.workspaces.create(&self.inner.reference).await
    }

    /// Start the background task that evicts idle and unclaimed workspaces.
    ///
    /// The task holds only a weak reference and stops once the state is
    /// dropped.
    pub fn spawn_workspace_sweeper(&self) -> JoinHandle<()> {
        let inner: Weak<AppStateInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(WORKSPACE_SWEEP_INTERVAL);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let evicted = inner.workspaces.evict_expired(WORKSPACE_EVICTION).await;
                if evicted > 0 {
                    let remaining = inner.workspaces.len().await;
                    tracing::info!(
                        evicted,
                        remaining,
                        "Evicted expired workspaces"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(AdminConfig::local()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_abandoned_workspaces() {
        let state = state();
        let sweeper = state.spawn_workspace_sweeper();

        let (kept, _) = state.open_workspace().await;
        let (abandoned, _) = state.open_workspace().await;

        // Only `kept` is ever used by a request.
        let mut elapsed = Duration::ZERO;
        while elapsed <= UNCLAIMED_WORKSPACE_GRACE + WORKSPACE_SWEEP_INTERVAL {
            assert!(state.workspaces().get(kept).await.is_some());
            tokio::time::sleep(WORKSPACE_SWEEP_INTERVAL).await;
            elapsed += WORKSPACE_SWEEP_INTERVAL;
        }

        assert!(state.workspaces().get(abandoned).await.is_none());
        assert!(state.workspaces().get(kept).await.is_some());
        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_with_state() {
        let state = state();
        let sweeper = state.spawn_workspace_sweeper();
        drop(state);

        tokio::time::sleep(WORKSPACE_SWEEP_INTERVAL * 2).await;
        assert!(sweeper.is_finished());
    }

    #[test]
    fn test_eviction_matches_session_expiry() {
        assert_eq!(WORKSPACE_EVICTION.idle, SESSION_IDLE_TIMEOUT);
        assert!(WORKSPACE_EVICTION.unclaimed < WORKSPACE_EVICTION.idle);
    }
}
