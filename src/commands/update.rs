use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::TodoUpdate;
use crate::store::{StorageBackend, TodoStore};
use crate::timer::WorkTimers;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Replace all fields of an active todo.
///
/// When the update completes a todo whose work timer is running, the flushed
/// total goes into the same write (unless the caller supplied an explicit
/// elapsed time) and the timer stops once the write succeeded.
pub fn run<B: StorageBackend>(
    store: &mut TodoStore<B>,
    timers: &mut WorkTimers,
    id: &str,
    mut update: TodoUpdate,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let stops_timer = update.completed && timers.is_running(id);
    if stops_timer {
        if let Some(total) = timers.pending_totals(store, &[id.to_string()], now).remove(id) {
            update.elapsed_time.get_or_insert(total);
        }
    }

    match store.update(id, update)? {
        Some(todo) => {
            if stops_timer {
                timers.cancel(id);
            }
            debug!(id, "todo updated");
            result.add_message(CmdMessage::success(format!("Todo updated: {}", todo.title)));
            Ok(result.with_affected_todos(vec![todo]))
        }
        None => {
            result.add_message(CmdMessage::info(format!("No active todo with id {}", id)));
            Ok(result)
        }
    }
}

/// Flip the completion flag of an active todo, keeping every other field.
pub fn toggle_completed<B: StorageBackend>(
    store: &mut TodoStore<B>,
    timers: &mut WorkTimers,
    id: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let Some(todo) = store.get(id) else {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info(format!("No active todo with id {}", id)));
        return Ok(result);
    };

    let update = TodoUpdate::from_todo(todo).with_completed(!todo.completed);
    run(store, timers, id, update, now)
}
