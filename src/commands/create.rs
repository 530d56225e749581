use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Category, Priority};
use crate::store::{StorageBackend, TodoStore};
use chrono::NaiveDateTime;
use tracing::info;

pub fn run<B: StorageBackend>(
    store: &mut TodoStore<B>,
    title: &str,
    category: Category,
    priority: Priority,
    due_date: Option<NaiveDateTime>,
) -> Result<CmdResult> {
    let todo = store.create(title, category, priority, due_date)?;
    info!(id = %todo.id, "todo created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Todo created: {}", todo.title)));
    Ok(result.with_affected_todos(vec![todo]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::helpers::fixtures::store;
    use crate::error::TickError;

    #[test]
    fn created_todo_is_found_by_id() {
        let mut store = store();
        let due = NaiveDateTime::parse_from_str("2024-07-01T09:15", "%Y-%m-%dT%H:%M").unwrap();
        let result = run(
            &mut store,
            "Call plumber",
            Category::Chores,
            Priority::High,
            Some(due),
        )
        .unwrap();

        let id = &result.affected_todos[0].id;
        let todo = store.get(id).unwrap();
        assert_eq!(todo.title, "Call plumber");
        assert_eq!(todo.category, Category::Chores);
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.due_date, Some(due));
        assert!(!todo.completed);
        assert_eq!(todo.elapsed_time, 0);
    }

    #[test]
    fn ids_are_unique() {
        let mut store = store();
        for _ in 0..20 {
            run(&mut store, "Same", Category::Work, Priority::Low, None).unwrap();
        }
        let mut ids: Vec<&str> = store.active().iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn empty_title_rejected() {
        let mut store = store();
        let result = run(&mut store, "", Category::Work, Priority::Low, None);
        assert!(matches!(result, Err(TickError::Validation(_))));
        assert!(store.active().is_empty());
    }
}
