//! # Command Layer
//!
//! This module contains the **core business logic** of ticktrack. Each
//! operation group lives in its own submodule as plain functions over the
//! [`TodoStore`](crate::store::TodoStore) and the transient engine state
//! (selection, work timers).
//!
//! ## Role and Responsibilities
//!
//! - Apply the lifecycle rules (create, edit, complete, archive, restore, delete)
//! - Apply eligibility filters for bulk and drag-and-drop actions
//! - Return structured [`CmdResult`]s with affected todos and leveled messages
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the store: no terminal, no files, no notifications
//! - **Identity resolution**: callers pass the current user id in
//! - **Clock reads**: callers pass `now`, which keeps every command deterministic
//!
//! ## Unknown Ids
//!
//! Operations that reference an id that is not where they expect it succeed
//! without touching state and report an info message. Only the advisory
//! errors in [`TickError`](crate::error::TickError) are returned as `Err`.
//!
//! ## Command Modules
//!
//! - [`create`]: Create new todos
//! - [`update`]: Full-field edits and completion toggling
//! - [`delete`]: Remove active todos and purge archived ones
//! - [`archive`]: Archive completed todos
//! - [`restore`]: Bring archived todos back
//! - [`reorder`]: Drag-and-drop reordering
//! - [`bulk`]: Selection-wide complete, delete and archive
//! - [`drop_zones`]: Drag onto the delete and done zones
//! - [`list`]: Sorted projections of both lists
//! - [`transfer`]: Export and import of transfer documents

use crate::model::Todo;
use serde::Serialize;

pub mod archive;
pub mod bulk;
pub mod create;
pub mod delete;
pub mod drop_zones;
pub mod helpers;
pub mod list;
pub mod reorder;
pub mod restore;
pub mod transfer;
pub mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Todos changed by the command, in their post-command state.
    pub affected_todos: Vec<Todo>,
    /// Todos to display.
    pub listed_todos: Vec<Todo>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_todos(mut self, todos: Vec<Todo>) -> Self {
        self.affected_todos = todos;
        self
    }

    pub fn with_listed_todos(mut self, todos: Vec<Todo>) -> Self {
        self.listed_todos = todos;
        self
    }

    /// Whether the command changed anything.
    pub fn changed(&self) -> bool {
        !self.affected_todos.is_empty()
    }
}
