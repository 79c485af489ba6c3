//! User-facing summary of a finished duplication.

use super::guard::GuardRejection;
use super::outcome::{DuplicationFailure, DuplicationNotice, DuplicationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One toast-style message describing how a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Callback invoked once per run with its summary (e.g. to show a toast).
pub type NotificationCallback = Arc<dyn Fn(Notification) + Send + Sync>;

/// Builds the summary shown to the user for a terminal outcome.
pub fn summarize(result: &DuplicationResult) -> Notification {
    use NotificationLevel::*;

    match result {
        Ok(report) => match report.notice {
            Some(DuplicationNotice::EmptySource) => Notification::new(
                Info,
                "The current chat is empty, nothing to copy. Created a new empty chat.",
            ),
            Some(DuplicationNotice::NoMatchingMessages) => Notification::new(
                Warning,
                format!(
                    "None of the configured messages exist in the current chat \
                     (skipped positions {:?}). Created a new empty chat.",
                    report.skipped
                ),
            ),
            None if report.skipped.is_empty() => Notification::new(
                Success,
                format!("Copied {} message(s) into a new chat and saved it.", report.copied),
            ),
            None => Notification::new(
                Success,
                format!(
                    "Copied {} message(s) into a new chat and saved it ({} position(s) skipped).",
                    report.copied,
                    report.skipped.len()
                ),
            ),
        },
        Err(DuplicationFailure::GuardRejected(GuardRejection::NoEntitySelected)) => {
            Notification::new(Warning, "Select a character or group first.")
        }
        Err(DuplicationFailure::GuardRejected(GuardRejection::OperationInProgress)) => {
            Notification::new(
                Warning,
                "A reply is being generated or the chat is being saved. Try again later.",
            )
        }
        Err(DuplicationFailure::SessionCreationFailed { source }) => {
            Notification::new(Error, format!("Could not create a new chat: {source}"))
        }
        Err(DuplicationFailure::PartialReplay {
            appended,
            total,
            cause,
            ..
        }) => Notification::new(
            Error,
            format!(
                "Copying stopped after {appended} of {total} message(s): {}. \
                 The new chat was left as is.",
                cause.source
            ),
        ),
        Err(DuplicationFailure::PersistFailed { copied, source, .. }) => Notification::new(
            Error,
            format!("Copied {copied} message(s) but saving the new chat failed: {source}"),
        ),
    }
}
