use crate::commands::CmdResult;
use crate::ordering::{sort, SortKey};
use crate::store::{StorageBackend, TodoStore};

/// The active list in display order.
pub fn active<B: StorageBackend>(store: &TodoStore<B>, key: SortKey) -> CmdResult {
    CmdResult::default().with_listed_todos(sort(store.active(), key))
}

/// The archived list in display order.
pub fn archived<B: StorageBackend>(store: &TodoStore<B>, key: SortKey) -> CmdResult {
    CmdResult::default().with_listed_todos(sort(store.archived(), key))
}
