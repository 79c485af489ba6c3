//! Precondition check run before a duplication touches anything.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a duplication was not allowed to start.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardRejection {
    /// No character or group is currently selected.
    #[error("no character or group is selected")]
    NoEntitySelected,
    /// A reply is being generated or the chat is being saved.
    #[error("a reply is being generated or the chat is being saved")]
    OperationInProgress,
}

/// Outcome of [`check_preconditions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardResult {
    Proceed,
    Rejected(GuardRejection),
}

impl GuardResult {
    pub fn into_result(self) -> Result<(), GuardRejection> {
        match self {
            GuardResult::Proceed => Ok(()),
            GuardResult::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Decides whether a duplication may start.
///
/// Entity selection is checked before the busy flags, so a call with no
/// entity and a busy store reports `NoEntitySelected`.
pub fn check_preconditions(
    entity_selected: bool,
    is_busy_generating: bool,
    is_busy_saving: bool,
) -> GuardResult {
    if !entity_selected {
        return GuardResult::Rejected(GuardRejection::NoEntitySelected);
    }
    if is_busy_generating || is_busy_saving {
        return GuardResult::Rejected(GuardRejection::OperationInProgress);
    }
    GuardResult::Proceed
}
