//! Outcome types of a duplication run.

use super::guard::GuardRejection;
use crate::error::ChatfillError;
use crate::session::SessionHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Steps of a duplication run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicationState {
    Idle,
    Guarding,
    Snapshotting,
    Selecting,
    CreatingSession,
    Replaying,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for DuplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicationState::Idle => "idle",
            DuplicationState::Guarding => "guarding",
            DuplicationState::Snapshotting => "snapshotting",
            DuplicationState::Selecting => "selecting",
            DuplicationState::CreatingSession => "creating_session",
            DuplicationState::Replaying => "replaying",
            DuplicationState::Persisting => "persisting",
            DuplicationState::Done => "done",
            DuplicationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Informational outcome of a run that created an empty destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicationNotice {
    /// The source conversation had no messages.
    EmptySource,
    /// None of the configured positions exist in the source conversation.
    NoMatchingMessages,
}

/// A single append rejected by the session store during replay.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to append message {index} (source position {position})")]
pub struct AppendFailed {
    /// Zero-based index within the replay batch.
    pub index: usize,
    /// Position the message had in the source conversation.
    pub position: usize,
    #[source]
    pub source: ChatfillError,
}

/// Why a duplication run ended in `Failed`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DuplicationFailure {
    /// The run was refused before anything was touched.
    #[error("duplication not started: {0}")]
    GuardRejected(GuardRejection),

    /// The destination session could not be created.
    #[error("failed to create the destination session")]
    SessionCreationFailed {
        #[source]
        source: ChatfillError,
    },

    /// Replay stopped partway. Already appended messages stay in place.
    #[error("replay stopped after {appended} of {total} messages")]
    PartialReplay {
        session: SessionHandle,
        appended: usize,
        total: usize,
        #[source]
        cause: AppendFailed,
    },

    /// The destination holds its messages but was not saved.
    #[error("failed to persist the destination session")]
    PersistFailed {
        session: SessionHandle,
        copied: usize,
        #[source]
        source: ChatfillError,
    },
}

impl DuplicationFailure {
    /// The step the run was in when it failed.
    pub fn failed_at(&self) -> DuplicationState {
        match self {
            DuplicationFailure::GuardRejected(_) => DuplicationState::Guarding,
            DuplicationFailure::SessionCreationFailed { .. } => DuplicationState::CreatingSession,
            DuplicationFailure::PartialReplay { .. } => DuplicationState::Replaying,
            DuplicationFailure::PersistFailed { .. } => DuplicationState::Persisting,
        }
    }

    /// Whether the failure left a destination session behind.
    pub fn destination(&self) -> Option<&SessionHandle> {
        match self {
            DuplicationFailure::PartialReplay { session, .. }
            | DuplicationFailure::PersistFailed { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// Summary of a run that reached `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationReport {
    /// Session that was active when the run started.
    pub source_session_id: Option<String>,
    /// The newly created destination session.
    pub destination: SessionHandle,
    /// Number of messages replayed into the destination.
    pub copied: usize,
    /// Configured positions that did not exist in the source.
    pub skipped: Vec<usize>,
    /// Set when the destination was intentionally left empty.
    pub notice: Option<DuplicationNotice>,
    /// Whether the destination was persisted.
    pub persisted: bool,
}

/// What [`ChatDuplicator::run`](super::ChatDuplicator::run) returns.
pub type DuplicationResult = std::result::Result<DuplicationReport, DuplicationFailure>;
