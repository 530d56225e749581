use crate::model::Todo;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Aggregate counts over the active list.
///
/// `overdue` counts incomplete todos whose due date is strictly in the past;
/// `pending` is whatever is neither completed nor overdue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn compute(todos: &[Todo], now: NaiveDateTime) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        let overdue = todos
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some_and(|due| due < now))
            .count();

        Self {
            total,
            completed,
            overdue,
            pending: total - completed - overdue,
        }
    }

    /// Share of completed todos, 0.0 for an empty list.
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
