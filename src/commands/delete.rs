use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{StorageBackend, TodoStore};
use crate::timer::WorkTimers;
use tracing::info;

/// Delete an active todo, cancelling its work timer.
///
/// Completed todos are refused with `CompletedNotRemovable`.
pub fn run<B: StorageBackend>(
    store: &mut TodoStore<B>,
    timers: &mut WorkTimers,
    id: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.remove(id)? {
        Some(todo) => {
            timers.cancel(id);
            info!(id, "todo deleted");
            result.add_message(CmdMessage::success(format!("Todo deleted: {}", todo.title)));
            Ok(result.with_affected_todos(vec![todo]))
        }
        None => {
            result.add_message(CmdMessage::info(format!("No active todo with id {}", id)));
            Ok(result)
        }
    }
}

/// Permanently delete an archived todo.
pub fn run_archived<B: StorageBackend>(store: &mut TodoStore<B>, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.delete_archived(id)? {
        Some(todo) => {
            info!(id, "archived todo deleted");
            result.add_message(CmdMessage::success(format!(
                "Archived todo deleted: {}",
                todo.title
            )));
            Ok(result.with_affected_todos(vec![todo]))
        }
        None => {
            result.add_message(CmdMessage::info(format!("No archived todo with id {}", id)));
            Ok(result)
        }
    }
}
