//! Selection-wide actions.
//!
//! Each action filters the selection down to eligible active todos and then
//! applies a single store transition, so either every eligible todo moves or
//! (when nothing is eligible) nothing does. The selection is cleared after a
//! successful action and kept when nothing was eligible.

use crate::commands::helpers::plural;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TickError};
use crate::selection::Selection;
use crate::store::{StorageBackend, TodoStore};
use crate::timer::WorkTimers;
use chrono::{DateTime, Utc};
use tracing::info;

pub(crate) const NO_OPEN_SELECTED: &str = "No non-completed todos selected";
pub(crate) const NO_COMPLETED_SELECTED: &str = "No completed todos selected";

/// Complete every selected todo that is not completed yet.
pub fn complete<B: StorageBackend>(
    store: &mut TodoStore<B>,
    selection: &mut Selection,
    timers: &mut WorkTimers,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let ids = selection.eligible(store.active(), |t| !t.completed);
    if ids.is_empty() {
        return Err(TickError::Eligibility(NO_OPEN_SELECTED.to_string()));
    }

    let totals = timers.pending_totals(store, &ids, now);
    let completed = store.complete_with_elapsed(&ids, &totals)?;
    for id in totals.keys() {
        timers.cancel(id);
    }
    selection.clear();
    info!(count = completed.len(), "bulk complete");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Completed {}",
        plural(completed.len(), "todo")
    )));
    Ok(result.with_affected_todos(completed))
}

/// Delete every selected todo that is not completed.
pub fn delete<B: StorageBackend>(
    store: &mut TodoStore<B>,
    selection: &mut Selection,
    timers: &mut WorkTimers,
) -> Result<CmdResult> {
    let ids = selection.eligible(store.active(), |t| !t.completed);
    if ids.is_empty() {
        return Err(TickError::Eligibility(NO_OPEN_SELECTED.to_string()));
    }

    let removed = store.remove_many(&ids)?;
    for todo in &removed {
        timers.cancel(&todo.id);
    }
    selection.clear();
    info!(count = removed.len(), "bulk delete");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted {}",
        plural(removed.len(), "todo")
    )));
    Ok(result.with_affected_todos(removed))
}

/// Archive every selected todo that is completed.
pub fn archive<B: StorageBackend>(
    store: &mut TodoStore<B>,
    selection: &mut Selection,
) -> Result<CmdResult> {
    let ids = selection.eligible(store.active(), |t| t.completed);
    if ids.is_empty() {
        return Err(TickError::Eligibility(NO_COMPLETED_SELECTED.to_string()));
    }

    let archived = store.archive_many(&ids)?;
    selection.clear();
    info!(count = archived.len(), "bulk archive");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Archived {}",
        plural(archived.len(), "todo")
    )));
    Ok(result.with_affected_todos(archived))
}
