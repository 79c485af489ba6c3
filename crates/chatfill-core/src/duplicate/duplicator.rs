//! The duplication pipeline: guard → snapshot → select → create → replay → persist.

use super::guard::{GuardRejection, GuardResult, check_preconditions};
use super::notification::{NotificationCallback, NotificationLevel, summarize};
use super::outcome::{
    AppendFailed, DuplicationFailure, DuplicationNotice, DuplicationReport, DuplicationResult,
    DuplicationState,
};
use super::selector::{SelectedMessage, SelectionError, select};
use crate::config::{DuplicationConfig, TargetPositions};
use crate::session::{AppendOptions, SessionHandle, SessionStore};
use std::sync::Arc;

/// Copies the configured messages of the active chat into a new chat.
///
/// `ChatDuplicator` drives a [`SessionStore`] through one sequential run per
/// call to [`run`](Self::run):
///
/// 1. Checks that an entity is selected and the store is not busy
/// 2. Captures the active chat's messages once
/// 3. Resolves the configured positions against that capture
/// 4. Creates a new session for the same entity, keeping the old one
/// 5. Appends the selected messages one by one, in position-list order
/// 6. Persists the new session
///
/// The duplicator holds no lock of its own. A second run started while one
/// is in flight is rejected only through the store's busy flags. Once a
/// destination exists, [`SessionStore::finish_operation`] is called exactly
/// once when the run ends.
///
/// Failures after the destination exists are not rolled back: the partially
/// filled or unsaved session is left for the caller to inspect.
pub struct ChatDuplicator {
    store: Arc<dyn SessionStore>,
    config: DuplicationConfig,
    notification_callback: Option<NotificationCallback>,
}

impl ChatDuplicator {
    /// Creates a duplicator over `store` using the positions in `config`.
    pub fn new(store: Arc<dyn SessionStore>, config: DuplicationConfig) -> Self {
        Self {
            store,
            config,
            notification_callback: None,
        }
    }

    /// Registers a callback that receives exactly one summary per run.
    pub fn with_notification_callback(mut self, callback: NotificationCallback) -> Self {
        self.notification_callback = Some(callback);
        self
    }

    pub fn target_positions(&self) -> &TargetPositions {
        &self.config.target_positions
    }

    /// Runs one duplication and reports its terminal outcome.
    pub async fn run(&self) -> DuplicationResult {
        let result = self.execute().await;

        let notification = summarize(&result);
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!("[ChatDuplicator] {}", notification.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!("[ChatDuplicator] {}", notification.message)
            }
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!("[ChatDuplicator] {}", notification.message)
            }
        }
        if let Some(callback) = &self.notification_callback {
            callback(notification);
        }

        result
    }

    async fn execute(&self) -> DuplicationResult {
        let mut state = DuplicationState::Idle;

        // --- Guarding ---
        transition(&mut state, DuplicationState::Guarding);
        let entity = self.store.active_entity().await;
        let guard = check_preconditions(
            entity.is_some(),
            self.store.is_generating().await,
            self.store.is_saving().await,
        );
        let entity = match (guard, entity) {
            (GuardResult::Proceed, Some(entity)) => entity,
            (GuardResult::Rejected(rejection), _) => {
                return Err(fail(&mut state, DuplicationFailure::GuardRejected(rejection)));
            }
            (GuardResult::Proceed, None) => {
                return Err(fail(
                    &mut state,
                    DuplicationFailure::GuardRejected(GuardRejection::NoEntitySelected),
                ));
            }
        };
        tracing::info!("[ChatDuplicator] Preconditions passed for {}", entity);

        // --- Snapshotting ---
        transition(&mut state, DuplicationState::Snapshotting);
        let source_session_id = self.store.current_session_id().await;
        let snapshot = self.store.current_messages().await;
        tracing::info!(
            "[ChatDuplicator] Captured {} message(s) from session {:?}, target positions {}",
            snapshot.len(),
            source_session_id,
            self.config.target_positions
        );

        // --- Selecting ---
        let (selected, skipped, notice) =
            match select(&snapshot, self.config.target_positions.as_slice()) {
                Err(SelectionError::EmptySourceConversation) => {
                    tracing::info!(
                        "[ChatDuplicator] Source chat is empty, creating an empty destination"
                    );
                    (Vec::new(), Vec::new(), Some(DuplicationNotice::EmptySource))
                }
                Ok(selection) => {
                    transition(&mut state, DuplicationState::Selecting);
                    if selection.is_empty() {
                        tracing::warn!(
                            "[ChatDuplicator] No configured position exists in the source chat, \
                             creating an empty destination"
                        );
                        (
                            Vec::new(),
                            selection.skipped,
                            Some(DuplicationNotice::NoMatchingMessages),
                        )
                    } else {
                        (selection.selected, selection.skipped, None)
                    }
                }
            };
        drop(snapshot);

        // --- CreatingSession ---
        transition(&mut state, DuplicationState::CreatingSession);
        let destination = match self.store.create_session(false).await {
            Ok(handle) => handle,
            Err(source) => {
                return Err(fail(
                    &mut state,
                    DuplicationFailure::SessionCreationFailed { source },
                ));
            }
        };
        tracing::info!(
            "[ChatDuplicator] Created destination session {} for {}",
            destination.id,
            destination.entity
        );

        let total = selected.len();
        let persisted = self
            .fill_destination(&mut state, &destination, selected, notice.is_some())
            .await;
        self.store.finish_operation().await;
        let persisted = persisted?;

        transition(&mut state, DuplicationState::Done);
        Ok(DuplicationReport {
            source_session_id,
            destination,
            copied: total,
            skipped,
            notice,
            persisted,
        })
    }

    /// Replays `selected` into the freshly created destination and persists
    /// it. Returns whether a persist happened.
    async fn fill_destination(
        &self,
        state: &mut DuplicationState,
        destination: &SessionHandle,
        selected: Vec<SelectedMessage>,
        degenerate: bool,
    ) -> Result<bool, DuplicationFailure> {
        // --- Replaying ---
        let total = selected.len();
        if total > 0 {
            transition(state, DuplicationState::Replaying);
        }
        for (index, SelectedMessage { position, message }) in selected.into_iter().enumerate() {
            tracing::debug!(
                "[ChatDuplicator] Appending {}/{} (source position {}): {}",
                index + 1,
                total,
                position,
                message.preview(60)
            );
            if let Err(source) = self
                .store
                .append_message(message, AppendOptions { scroll: false })
                .await
            {
                return Err(fail(
                    state,
                    DuplicationFailure::PartialReplay {
                        session: destination.clone(),
                        appended: index,
                        total,
                        cause: AppendFailed {
                            index,
                            position,
                            source,
                        },
                    },
                ));
            }
        }

        // --- Persisting ---
        if degenerate && !self.config.persist_empty_destination {
            return Ok(false);
        }
        transition(state, DuplicationState::Persisting);
        if let Err(source) = self.store.persist_current_session().await {
            return Err(fail(
                state,
                DuplicationFailure::PersistFailed {
                    session: destination.clone(),
                    copied: total,
                    source,
                },
            ));
        }
        Ok(true)
    }
}

fn fail(state: &mut DuplicationState, failure: DuplicationFailure) -> DuplicationFailure {
    tracing::debug!("[ChatDuplicator] Failed while {}: {}", state, failure);
    transition(state, DuplicationState::Failed);
    failure
}

fn transition(state: &mut DuplicationState, next: DuplicationState) {
    tracing::debug!("[ChatDuplicator] {} -> {}", state, next);
    *state = next;
}
