use super::backend::StorageBackend;
use super::{keys, Scope};
use crate::error::{Result, TickError};
use crate::model::{truncate_due_date, validate_title, Category, Priority, Todo, TodoUpdate};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, warn};

/// Owner of the active and archived todo lists.
///
/// Invariants held by every operation:
/// - an id appears at most once across both lists;
/// - every archived todo is completed;
/// - a todo is never in both lists.
///
/// Cross-list moves are applied to a working copy of both lists, persisted,
/// and only then swapped in, so no caller ever observes a half-applied move.
pub struct TodoStore<B: StorageBackend> {
    backend: Rc<B>,
    active: Vec<Todo>,
    archived: Vec<Todo>,
}

/// Records that survived coercion, plus the reasons the others were dropped.
#[derive(Debug, Default)]
pub struct Coerced {
    pub todos: Vec<Todo>,
    pub quarantined: Vec<String>,
}

impl<B: StorageBackend> TodoStore<B> {
    /// An empty store that has not read anything from the backend yet.
    pub fn with_backend(backend: Rc<B>) -> Self {
        Self {
            backend,
            active: Vec::new(),
            archived: Vec::new(),
        }
    }

    /// Read both lists from durable storage.
    ///
    /// Corrupt blobs reset the affected list to empty; only backend I/O
    /// failures are returned as errors.
    pub fn load(backend: Rc<B>) -> Result<Self> {
        let mut seen = HashSet::new();
        let active = read_list(backend.as_ref(), keys::TODOS, &mut seen, false)?;
        let archived = read_list(backend.as_ref(), keys::ARCHIVED_TODOS, &mut seen, true)?;
        debug!(
            active = active.len(),
            archived = archived.len(),
            "loaded todo lists"
        );
        Ok(Self {
            backend,
            active,
            archived,
        })
    }

    pub fn save(&self) -> Result<()> {
        persist(self.backend.as_ref(), &self.active, &self.archived, false)
    }

    /// Empty both lists and persist the empty state.
    pub fn clear(&mut self) -> Result<()> {
        self.apply(|active, archived| {
            active.clear();
            archived.clear();
        })
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn active(&self) -> &[Todo] {
        &self.active
    }

    pub fn archived(&self) -> &[Todo] {
        &self.archived
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.active.iter().find(|t| t.id == id)
    }

    pub fn get_archived(&self, id: &str) -> Option<&Todo> {
        self.archived.iter().find(|t| t.id == id)
    }

    /// Whether `id` is taken in either list.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some() || self.get_archived(id).is_some()
    }

    /// Append a new incomplete todo to the end of the active list.
    pub fn create(
        &mut self,
        title: &str,
        category: Category,
        priority: Priority,
        due_date: Option<NaiveDateTime>,
    ) -> Result<Todo> {
        let mut todo = Todo::new(title, category.clone(), priority, due_date)?;
        while self.contains(&todo.id) {
            todo = Todo::new(title, category.clone(), priority, due_date)?;
        }

        let created = todo.clone();
        self.apply(move |active, _| active.push(todo))?;
        Ok(created)
    }

    /// Replace every field of an active todo. Returns `None` when `id` is not
    /// in the active list.
    pub fn update(&mut self, id: &str, update: TodoUpdate) -> Result<Option<Todo>> {
        let title = validate_title(&update.title)?;
        let Some(idx) = position(&self.active, id) else {
            return Ok(None);
        };

        self.apply(move |active, _| {
            let todo = &mut active[idx];
            todo.title = title;
            todo.category = update.category;
            todo.priority = update.priority;
            todo.due_date = truncate_due_date(update.due_date);
            todo.completed = update.completed;
            if let Some(seconds) = update.elapsed_time {
                todo.elapsed_time = seconds;
            }
            todo.clone()
        })
        .map(Some)
    }

    /// Delete an active todo. Completed todos are refused, they leave the
    /// active list through archival.
    pub fn remove(&mut self, id: &str) -> Result<Option<Todo>> {
        let Some(idx) = position(&self.active, id) else {
            return Ok(None);
        };
        if self.active[idx].completed {
            return Err(TickError::CompletedNotRemovable(
                self.active[idx].title.clone(),
            ));
        }
        self.apply(move |active, _| active.remove(idx)).map(Some)
    }

    /// Move a completed todo from the active list to the end of the archived
    /// list. Incomplete or unknown todos are left alone.
    pub fn archive(&mut self, id: &str) -> Result<Option<Todo>> {
        let Some(idx) = position(&self.active, id) else {
            return Ok(None);
        };
        if !self.active[idx].completed {
            return Ok(None);
        }
        self.apply(move |active, archived| {
            let todo = active.remove(idx);
            archived.push(todo.clone());
            todo
        })
        .map(Some)
    }

    /// Move an archived todo back to the end of the active list.
    pub fn restore(&mut self, id: &str) -> Result<Option<Todo>> {
        let Some(idx) = position(&self.archived, id) else {
            return Ok(None);
        };
        self.apply(move |active, archived| {
            let todo = archived.remove(idx);
            active.push(todo.clone());
            todo
        })
        .map(Some)
    }

    /// Permanently remove an archived todo.
    pub fn delete_archived(&mut self, id: &str) -> Result<Option<Todo>> {
        let Some(idx) = position(&self.archived, id) else {
            return Ok(None);
        };
        self.apply(move |_, archived| archived.remove(idx)).map(Some)
    }

    /// Take `dragged_id` out of the active list and insert it at the index
    /// `target_id` occupied before the removal. Returns whether anything moved.
    /// Completed todos are not draggable and stay in place.
    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<bool> {
        if dragged_id == target_id {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (
            position(&self.active, dragged_id),
            position(&self.active, target_id),
        ) else {
            return Ok(false);
        };
        if self.active[from].completed {
            return Ok(false);
        }

        self.apply(move |active, _| {
            let todo = active.remove(from);
            active.insert(to, todo);
        })?;
        Ok(true)
    }

    /// Mark every listed, currently incomplete active todo as completed.
    /// All other fields are preserved. Returns the todos that changed.
    pub fn complete_many(&mut self, ids: &[String]) -> Result<Vec<Todo>> {
        self.complete_with_elapsed(ids, &HashMap::new())
    }

    /// Like [`complete_many`](Self::complete_many), also setting the
    /// `elapsed_time` of the todos found in `elapsed` within the same write.
    pub fn complete_with_elapsed(
        &mut self,
        ids: &[String],
        elapsed: &HashMap<String, u64>,
    ) -> Result<Vec<Todo>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.apply(move |active, _| {
            active
                .iter_mut()
                .filter(|t| !t.completed && wanted.contains(t.id.as_str()))
                .map(|t| {
                    t.completed = true;
                    if let Some(seconds) = elapsed.get(&t.id) {
                        t.elapsed_time = *seconds;
                    }
                    t.clone()
                })
                .collect()
        })
    }

    /// Remove every listed, currently incomplete active todo.
    pub fn remove_many(&mut self, ids: &[String]) -> Result<Vec<Todo>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.apply(move |active, _| {
            let (removed, kept): (Vec<Todo>, Vec<Todo>) = std::mem::take(active)
                .into_iter()
                .partition(|t| !t.completed && wanted.contains(t.id.as_str()));
            *active = kept;
            removed
        })
    }

    /// Archive every listed, currently completed active todo, preserving
    /// their relative order at the end of the archived list.
    pub fn archive_many(&mut self, ids: &[String]) -> Result<Vec<Todo>> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.apply(move |active, archived| {
            let (moved, kept): (Vec<Todo>, Vec<Todo>) = std::mem::take(active)
                .into_iter()
                .partition(|t| t.completed && wanted.contains(t.id.as_str()));
            *active = kept;
            archived.extend(moved.iter().cloned());
            moved
        })
    }

    /// Overwrite the active list, and the archived list when given.
    ///
    /// Callers are expected to pass coerced records (see [`coerce_records`]).
    pub fn replace(&mut self, todos: Vec<Todo>, archived_todos: Option<Vec<Todo>>) -> Result<()> {
        self.apply(move |active, archived| {
            *active = todos;
            if let Some(list) = archived_todos {
                *archived = list;
            }
        })
    }

    /// Run `f` against copies of both lists, persist the result, then commit it.
    fn apply<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Todo>, &mut Vec<Todo>) -> T,
    {
        let mut active = self.active.clone();
        let mut archived = self.archived.clone();
        let out = f(&mut active, &mut archived);
        let archived_first = archived.len() > self.archived.len();
        persist(self.backend.as_ref(), &active, &archived, archived_first)?;
        self.active = active;
        self.archived = archived;
        Ok(out)
    }
}

fn position(list: &[Todo], id: &str) -> Option<usize> {
    list.iter().position(|t| t.id == id)
}

/// Write both lists. The list that gains todos is written first, so a crash
/// between the two writes leaves a duplicate (dropped again by `load`) rather
/// than a lost todo. When the second write fails the first key is put back.
fn persist<B: StorageBackend>(
    backend: &B,
    active: &[Todo],
    archived: &[Todo],
    archived_first: bool,
) -> Result<()> {
    let todos = serde_json::to_string(active)?;
    let archived_todos = serde_json::to_string(archived)?;
    let (first, second) = if archived_first {
        ((keys::ARCHIVED_TODOS, archived_todos), (keys::TODOS, todos))
    } else {
        ((keys::TODOS, todos), (keys::ARCHIVED_TODOS, archived_todos))
    };

    let previous = backend.get(Scope::Durable, first.0)?;
    backend.set(Scope::Durable, first.0, &first.1)?;
    if let Err(e) = backend.set(Scope::Durable, second.0, &second.1) {
        let rollback = match previous {
            Some(raw) => backend.set(Scope::Durable, first.0, &raw),
            None => backend.remove(Scope::Durable, first.0),
        };
        if let Err(rollback_err) = rollback {
            warn!(key = first.0, error = %rollback_err, "could not roll back partial write");
        }
        return Err(e);
    }
    Ok(())
}

fn read_list<B: StorageBackend>(
    backend: &B,
    key: &str,
    seen: &mut HashSet<String>,
    archived: bool,
) -> Result<Vec<Todo>> {
    let Some(raw) = backend.get(Scope::Durable, key)? else {
        return Ok(Vec::new());
    };

    let records = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!(key, "persisted todo list is not an array, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            warn!(key, error = %e, "persisted todo list is corrupt, starting empty");
            return Ok(Vec::new());
        }
    };

    let coerced = coerce_records(&records, seen, archived);
    for reason in &coerced.quarantined {
        warn!(key, reason = %reason, "dropped persisted todo");
    }
    Ok(coerced.todos)
}

/// Coerce loose JSON records into todos.
///
/// Records without an id or a title, and records whose id is already in
/// `seen`, are quarantined. When `archived` is set every surviving record is
/// forced to `completed = true`.
pub fn coerce_records(records: &[Value], seen: &mut HashSet<String>, archived: bool) -> Coerced {
    let mut out = Coerced::default();
    for record in records {
        match Todo::from_value(record) {
            Ok(mut todo) => {
                if !seen.insert(todo.id.clone()) {
                    out.quarantined.push(format!("duplicate id {}", todo.id));
                    continue;
                }
                if archived {
                    todo.completed = true;
                }
                out.todos.push(todo);
            }
            Err(reason) => out.quarantined.push(reason),
        }
    }
    out
}
