use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{StorageBackend, TodoStore};
use tracing::info;

/// Archive a completed active todo. Incomplete todos stay where they are.
pub fn run<B: StorageBackend>(store: &mut TodoStore<B>, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    if let Some(todo) = store.archive(id)? {
        info!(id, "todo archived");
        result.add_message(CmdMessage::success(format!("Todo archived: {}", todo.title)));
        return Ok(result.with_affected_todos(vec![todo]));
    }

    match store.get(id) {
        Some(todo) => result.add_message(CmdMessage::info(format!(
            "Only completed todos can be archived: {}",
            todo.title
        ))),
        None => result.add_message(CmdMessage::info(format!("No active todo with id {}", id))),
    }
    Ok(result)
}
