//! Simulated-latency action runner.
//!
//! Every mutating form on a signed-in workspace (save configuration, create
//! user, process upload, analyze) goes through [`perform`]. Sign-in has no
//! workspace yet and is gated by [`LoginGate`](crate::services::LoginGate)
//! instead.
//!
//! 1. Mark the action pending on the workspace's [`ActionBoard`]; a second
//!    submission of the same action is rejected while it is pending
//! 2. Wait the configured delay and run the action's work, without holding
//!    the workspace lock
//! 3. Re-lock the workspace and apply the result, unless the workspace was
//!    cancelled in the meantime
//!
//! A failed action is recorded as [`ActionState::Failed`] with the message
//! safe to show users, and leaves the workspace untouched. Dropping the
//! request mid-flight resets the action to idle.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::error::AppError;
use crate::store::{Workspace, WorkspaceHandle};

/// The mutating actions a workspace can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Login,
    SaveConfiguration,
    CreateUser,
    ProcessUpload,
    Analyze,
}

impl ActionKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SaveConfiguration => "save configuration",
            Self::CreateUser => "create user",
            Self::ProcessUpload => "process upload",
            Self::Analyze => "analyze",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle of one action kind on one workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    /// The last run returned an error. Holds the user-facing message only;
    /// details go to the log. A new submission is accepted.
    Failed(String),
}

/// Per-workspace busy flags, one per [`ActionKind`].
#[derive(Debug, Default)]
pub struct ActionBoard {
    states: HashMap<ActionKind, ActionState>,
}

impl ActionBoard {
    #[must_use]
    pub fn state(&self, kind: ActionKind) -> ActionState {
        self.states.get(&kind).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn is_pending(&self, kind: ActionKind) -> bool {
        matches!(self.states.get(&kind), Some(ActionState::Pending))
    }

    /// Mark `kind` pending.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Busy`] if `kind` is already pending.
    pub fn begin(&mut self, kind: ActionKind) -> Result<(), AppError> {
        if self.is_pending(kind) {
            return Err(AppError::Busy(kind));
        }
        self.states.insert(kind, ActionState::Pending);
        Ok(())
    }

    pub fn finish(&mut self, kind: ActionKind) {
        self.states.remove(&kind);
    }

    pub fn fail(&mut self, kind: ActionKind, reason: impl Into<String>) {
        self.states.insert(kind, ActionState::Failed(reason.into()));
    }
}

/// Owner side of a workspace's cancellation signal.
#[derive(Debug)]
pub struct Cancellation {
    sender: watch::Sender<bool>,
}

impl Cancellation {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a workspace's cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the workspace is cancelled or dropped.
    pub async fn cancelled(&mut self) {
        // An error means the sender is gone along with its workspace.
        let _ = self.receiver.wait_for(|cancelled| *cancelled).await;
    }
}

/// Resets an action to idle if the request future is dropped mid-flight.
struct PendingAction<'a> {
    handle: &'a WorkspaceHandle,
    kind: ActionKind,
    armed: bool,
}

impl<'a> PendingAction<'a> {
    const fn new(handle: &'a WorkspaceHandle, kind: ActionKind) -> Self {
        Self {
            handle,
            kind,
            armed: true,
        }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingAction<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(action = %self.kind, "Pending action abandoned");
            self.handle.lock().actions.finish(self.kind);
        }
    }
}

/// Run one simulated-latency action against a workspace.
///
/// `work` runs after `delay` and must not touch the workspace; `apply`
/// receives its output together with the locked workspace.
///
/// # Errors
///
/// - [`AppError::Busy`] if the same action is already pending
/// - [`AppError::Cancelled`] if the workspace was cancelled before `apply`
/// - any error returned by `work` or `apply`, after recording it as failed
#[instrument(skip_all, fields(action = %kind, delay = ?delay))]
pub async fn perform<T, R, W, A>(
    handle: &WorkspaceHandle,
    kind: ActionKind,
    delay: Duration,
    work: W,
    apply: A,
) -> Result<R, AppError>
where
    W: Future<Output = Result<T, AppError>>,
    A: FnOnce(&mut Workspace, T) -> Result<R, AppError>,
{
    let mut token = {
        let mut workspace = handle.lock();
        workspace.actions.begin(kind)?;
        workspace.cancel_token()
    };
    let mut pending = PendingAction::new(handle, kind);

    let outcome = tokio::select! {
        () = token.cancelled() => None,
        result = async {
            tokio::time::sleep(delay).await;
            work.await
        } => Some(result),
    };

    let mut workspace = handle.lock();
    pending.disarm();

    let output = match outcome {
        Some(Ok(output)) if !token.is_cancelled() => output,
        Some(Err(err)) => {
            warn!(error = %err, "Action failed");
            workspace.actions.fail(kind, err.user_message());
            return Err(err);
        }
        _ => {
            debug!("Action cancelled");
            workspace.actions.finish(kind);
            return Err(AppError::Cancelled);
        }
    };

    match apply(&mut workspace, output) {
        Ok(value) => {
            workspace.actions.finish(kind);
            Ok(value)
        }
        Err(err) => {
            warn!(error = %err, "Action could not be applied");
            workspace.actions.fail(kind, err.user_message());
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use prifam_core::PlatformId;

    use super::*;
    use crate::store::ReferenceData;

    fn handle() -> (ReferenceData, WorkspaceHandle) {
        let reference = ReferenceData::seeded().unwrap();
        let handle = WorkspaceHandle::new(Workspace::from_reference(&reference));
        (reference, handle)
    }

    const DELAY: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn test_perform_applies_after_delay() {
        let (_, handle) = handle();
        let started = tokio::time::Instant::now();

        let active = perform(
            &handle,
            ActionKind::SaveConfiguration,
            DELAY,
            async { Ok(()) },
            |ws, ()| {
                ws.mark_saved();
                Ok(ws.active_platform_count())
            },
        )
        .await
        .unwrap();

        assert_eq!(active, 3);
        assert!(started.elapsed() >= DELAY);
        assert_eq!(
            handle.lock().actions.state(ActionKind::SaveConfiguration),
            ActionState::Idle
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submission_rejected_while_pending() {
        let (_, handle) = handle();
        let handle = Arc::new(handle);

        let first = {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move {
                perform(
                    &handle,
                    ActionKind::CreateUser,
                    DELAY,
                    async { Ok(()) },
                    |_, ()| Ok(()),
                )
                .await
            })
        };
        tokio::task::yield_now().await;
        assert!(handle.lock().actions.is_pending(ActionKind::CreateUser));

        let second = perform(
            &handle,
            ActionKind::CreateUser,
            DELAY,
            async { Ok(()) },
            |_, ()| Ok(()),
        )
        .await;
        assert!(matches!(second, Err(AppError::Busy(ActionKind::CreateUser))));

        // A different action kind is not blocked.
        perform(
            &handle,
            ActionKind::Analyze,
            Duration::ZERO,
            async { Ok(()) },
            |_, ()| Ok(()),
        )
        .await
        .unwrap();

        first.await.unwrap().unwrap();
        assert!(!handle.lock().actions.is_pending(ActionKind::CreateUser));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_action_never_mutates() {
        let (reference, handle) = handle();
        let handle = Arc::new(handle);

        let task = {
            let handle = Arc::clone(&handle);
            tokio::spawn(async move {
                perform(
                    &handle,
                    ActionKind::SaveConfiguration,
                    DELAY,
                    async { Ok(()) },
                    |ws, ()| {
                        ws.toggle_platform(&PlatformId::from("dunzo"))?;
                        Ok(())
                    },
                )
                .await
            })
        };
        tokio::task::yield_now().await;
        handle.lock().cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(handle.lock().platforms, reference.platforms);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_work_records_reason_and_accepts_retry() {
        let (reference, handle) = handle();

        let result: Result<(), AppError> = perform(
            &handle,
            ActionKind::Analyze,
            DELAY,
            async { Err::<(), _>(AppError::Internal("classifier down".to_string())) },
            |ws, ()| {
                ws.reset_platforms(&reference);
                Ok(())
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(
            handle.lock().actions.state(ActionKind::Analyze),
            ActionState::Failed("Internal server error".to_string())
        );

        perform(
            &handle,
            ActionKind::Analyze,
            DELAY,
            async { Ok(()) },
            |_, ()| Ok(()),
        )
        .await
        .unwrap();
        assert_eq!(
            handle.lock().actions.state(ActionKind::Analyze),
            ActionState::Idle
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_resets_to_idle() {
        let (_, handle) = handle();

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            perform(
                &handle,
                ActionKind::ProcessUpload,
                DELAY,
                async { Ok(()) },
                |_, ()| Ok(()),
            ),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(
            handle.lock().actions.state(ActionKind::ProcessUpload),
            ActionState::Idle
        );
    }

    #[test]
    fn test_cancel_token_observes_cancel() {
        let cancellation = Cancellation::new();
        let token = cancellation.token();
        assert!(!token.is_cancelled());
        cancellation.cancel();
        assert!(token.is_cancelled());
        assert!(cancellation.is_cancelled());
    }
}
