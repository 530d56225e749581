//! # Storage Layer
//!
//! This module defines the persistence abstraction for ticktrack. The
//! [`StorageBackend`] trait is a plain string key-value store with two
//! independent lifetimes ([`Scope`]), and [`TodoStore`] is the single owner of
//! the active and archived todo lists built on top of it.
//!
//! ## Storage Layout
//!
//! ```text
//! Durable scope
//! ├── todos           JSON array of Todo (active list, in display order)
//! ├── archivedTodos   JSON array of Todo (archived list)
//! ├── darkMode        "true" | "false"
//! ├── userId          last resolved user id
//! └── users           JSON array of registered users
//!
//! Session scope
//! └── user            JSON object of the logged-in user, cleared on logout
//! ```
//!
//! ## Lifecycle
//!
//! - `TodoStore::load` at startup. Corrupt or non-array blobs are logged and
//!   treated as "no prior data", never propagated as errors.
//! - Every mutation persists both lists before it becomes visible. If the write
//!   fails the in-memory lists are left untouched.
//! - `TodoStore::clear` empties both lists.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production backend, one JSON file per key.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod todo_store;

pub use backend::StorageBackend;
pub use todo_store::TodoStore;

/// Lifetime of a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Survives restarts.
    Durable,
    /// Lives for one authenticated session.
    Session,
}

/// Well-known storage keys.
pub mod keys {
    pub const TODOS: &str = "todos";
    pub const ARCHIVED_TODOS: &str = "archivedTodos";
    pub const DARK_MODE: &str = "darkMode";
    pub const USER_ID: &str = "userId";
    pub const USERS: &str = "users";
    pub const SESSION_USER: &str = "user";
}
