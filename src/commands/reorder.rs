use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{StorageBackend, TodoStore};
use tracing::debug;

/// Drop `dragged_id` onto `target_id` in the active list.
///
/// The dragged todo is taken out and reinserted at the index the target
/// occupied before the removal, so dragging downwards lands after the target
/// and dragging upwards lands before it. Every other todo keeps its relative
/// order. Completed todos are not draggable.
pub fn run<B: StorageBackend>(
    store: &mut TodoStore<B>,
    dragged_id: &str,
    target_id: &str,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.get(dragged_id).is_some_and(|t| t.completed) {
        result.add_message(CmdMessage::info("Completed todos cannot be moved"));
        return Ok(result);
    }
    if store.reorder(dragged_id, target_id)? {
        debug!(dragged_id, target_id, "todo reordered");
        if let Some(todo) = store.get(dragged_id) {
            result.affected_todos.push(todo.clone());
        }
    } else {
        result.add_message(CmdMessage::info("Nothing to reorder"));
    }
    Ok(result)
}
