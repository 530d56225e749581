//! Drag-and-drop targets other than reordering.
//!
//! Dropping a single dragged todo acts on that todo alone. Dropping with no
//! dragged todo acts on the selection, with the same eligibility rules as the
//! bulk actions, except that nothing eligible is a quiet no-op rather than an
//! error. The selection is cleared either way.

use crate::commands::{bulk, delete, update, CmdMessage, CmdResult};
use crate::error::{Result, TickError};
use crate::selection::Selection;
use crate::store::{StorageBackend, TodoStore};
use crate::timer::WorkTimers;
use chrono::{DateTime, Utc};

pub fn on_delete<B: StorageBackend>(
    store: &mut TodoStore<B>,
    selection: &mut Selection,
    timers: &mut WorkTimers,
    dragged: Option<&str>,
) -> Result<CmdResult> {
    match dragged {
        Some(id) => {
            let result = delete::run(store, timers, id);
            selection.clear();
            result
        }
        None => {
            let result = quiet_when_ineligible(bulk::delete(store, selection, timers));
            selection.clear();
            result
        }
    }
}

pub fn on_done<B: StorageBackend>(
    store: &mut TodoStore<B>,
    selection: &mut Selection,
    timers: &mut WorkTimers,
    dragged: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let Some(id) = dragged else {
        let result = quiet_when_ineligible(bulk::complete(store, selection, timers, now));
        selection.clear();
        return result;
    };
    selection.clear();

    match store.get(id) {
        Some(todo) if todo.completed => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(format!(
                "Already completed: {}",
                todo.title
            )));
            Ok(result)
        }
        Some(_) => update::toggle_completed(store, timers, id, now),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(format!("No active todo with id {}", id)));
            Ok(result)
        }
    }
}

fn quiet_when_ineligible(result: Result<CmdResult>) -> Result<CmdResult> {
    match result {
        Err(TickError::Eligibility(reason)) => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(reason));
            Ok(result)
        }
        other => other,
    }
}
