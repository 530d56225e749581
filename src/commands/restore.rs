use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{StorageBackend, TodoStore};
use tracing::info;

/// Move an archived todo back to the end of the active list.
pub fn run<B: StorageBackend>(store: &mut TodoStore<B>, id: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.restore(id)? {
        Some(todo) => {
            info!(id, "todo restored");
            result.add_message(CmdMessage::success(format!("Todo restored: {}", todo.title)));
            Ok(result.with_affected_todos(vec![todo]))
        }
        None => {
            result.add_message(CmdMessage::info(format!("No archived todo with id {}", id)));
            Ok(result)
        }
    }
}
