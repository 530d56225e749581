//! # Transfer Documents
//!
//! Export writes both lists, stamped with the current user id, into a
//! portable JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "exportedAt": "2024-05-01T12:00:00.000Z",
//!   "todos": [...],
//!   "archivedTodos": [...],
//!   "user": { "id": "...", "exportTime": "2024-05-01T12:00:00.000Z" }
//! }
//! ```
//!
//! Import is a full overwrite, not a merge:
//!
//! 1. `todos` must be an array, otherwise the document is rejected.
//! 2. A `user.id` in the document must match the current user id. Any id
//!    other than `null`, `false`, `0` or `""` counts, whatever its JSON type.
//! 3. Records are coerced into todos; broken or duplicate records are
//!    quarantined and reported.
//! 4. The active list is always replaced. The archived list is replaced only
//!    when the document carries an `archivedTodos` array.
//!
//! Nothing is written unless every check passes.

use crate::commands::helpers::plural;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, TickError};
use crate::model::Todo;
use crate::store::todo_store::coerce_records;
use crate::store::{StorageBackend, TodoStore};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    pub version: u32,
    pub exported_at: String,
    pub todos: Vec<Todo>,
    pub archived_todos: Vec<Todo>,
    pub user: DocumentOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOwner {
    pub id: String,
    pub export_time: String,
}

/// Snapshot both lists for `user_id`.
pub fn export<B: StorageBackend>(
    store: &TodoStore<B>,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TransferDocument> {
    if store.active().is_empty() {
        return Err(TickError::NothingToExport);
    }
    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or(TickError::Unidentified)?;

    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    info!(
        active = store.active().len(),
        archived = store.archived().len(),
        "exporting todos"
    );
    Ok(TransferDocument {
        version: DOCUMENT_VERSION,
        exported_at: stamp.clone(),
        todos: store.active().to_vec(),
        archived_todos: store.archived().to_vec(),
        user: DocumentOwner {
            id: user_id.to_string(),
            export_time: stamp,
        },
    })
}

/// Pretty-printed JSON text of an export.
pub fn export_json<B: StorageBackend>(
    store: &TodoStore<B>,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String> {
    let document = export(store, user_id, now)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Suggested file name for an export taken at `now`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("todos-{}.json", now.format("%Y-%m-%d"))
}

/// Import JSON text. Text that does not parse is a format error.
pub fn import_json<B: StorageBackend>(
    store: &mut TodoStore<B>,
    raw: &str,
    user_id: Option<&str>,
) -> Result<CmdResult> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| TickError::Format(e.to_string()))?;
    import(store, &document, user_id)
}

/// Import an already parsed document.
pub fn import<B: StorageBackend>(
    store: &mut TodoStore<B>,
    document: &Value,
    user_id: Option<&str>,
) -> Result<CmdResult> {
    let records = document
        .get("todos")
        .and_then(Value::as_array)
        .ok_or_else(|| TickError::Format("todos must be an array".to_string()))?;

    if let Some(owner) = document_owner(document) {
        let current = user_id.unwrap_or_default();
        if owner != current {
            warn!(document = %owner, current, "refusing import of foreign todo list");
            return Err(TickError::Ownership {
                document: owner,
                current: current.to_string(),
            });
        }
    }

    let archived_records = document.get("archivedTodos").and_then(Value::as_array);

    let mut seen: HashSet<String> = HashSet::new();
    if archived_records.is_none() {
        seen.extend(store.archived().iter().map(|t| t.id.clone()));
    }
    let active = coerce_records(records, &mut seen, false);
    let archived = archived_records.map(|records| coerce_records(records, &mut seen, true));

    let mut quarantined = active.quarantined;
    let archived_todos = archived.map(|coerced| {
        quarantined.extend(coerced.quarantined);
        coerced.todos
    });
    for reason in &quarantined {
        warn!(reason = %reason, "skipped imported record");
    }

    let imported = active.todos;
    store.replace(imported.clone(), archived_todos)?;
    info!(count = imported.len(), "imported todos");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {}!",
        plural(imported.len(), "todo")
    )));
    if !quarantined.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Skipped {} that could not be read",
            plural(quarantined.len(), "record")
        )));
    }
    Ok(result.with_affected_todos(imported))
}

/// The owner stamped on a document, if any.
///
/// Only `null`, `false`, `0` and the empty string count as "no owner"; any
/// other id is compared by its text (strings as-is, everything else as JSON).
fn document_owner(document: &Value) -> Option<String> {
    match document.get("user")?.get("id")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(id) if id.is_empty() => None,
        Value::String(id) => Some(id.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
