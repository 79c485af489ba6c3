use super::Context;
use crate::output::print_notification;
use anyhow::{Context as _, Result};
use chatfill_core::config::TargetPositions;
use chatfill_core::duplicate::{ChatDuplicator, DuplicationFailure};
use chatfill_core::session::EntityRef;
use chatfill_infrastructure::FileSessionStore;
use std::process::ExitCode;
use std::sync::Arc;

/// Opens `session_id` for `entity` and copies the configured messages into a new chat.
///
/// Exit codes: `0` on success (including informational outcomes), `2` when the
/// run was refused up front, `1` on any failure after that.
pub async fn run(
    ctx: &Context,
    entity: EntityRef,
    session_id: &str,
    positions: Option<TargetPositions>,
) -> Result<ExitCode> {
    let root = ctx.config()?;
    let store = Arc::new(FileSessionStore::new(ctx.sessions_dir()?)?);
    store.select_entity(entity.clone()).await?;
    store
        .open_session(session_id)
        .await
        .with_context(|| format!("Failed to open chat {} of {}", session_id, entity))?;

    let mut config = root.duplication;
    if let Some(positions) = positions {
        config.target_positions = positions;
    }

    let duplicator =
        ChatDuplicator::new(store, config).with_notification_callback(Arc::new(print_notification));

    match duplicator.run().await {
        Ok(report) => {
            println!("New chat: {}", report.destination.id);
            Ok(ExitCode::SUCCESS)
        }
        Err(DuplicationFailure::GuardRejected(_)) => Ok(ExitCode::from(2)),
        Err(failure) => {
            if let Some(destination) = failure.destination() {
                println!("Partially filled chat left in place: {}", destination.id);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
