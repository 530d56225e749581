//! # Ordering Engine
//!
//! Pure projection of a todo list under one of five sort keys. The store keeps
//! todos in insertion/drag order; this module only decides display order and
//! never mutates anything.
//!
//! ## Buckets
//!
//! Every key first splits the list by completion state:
//!
//! - `completed`: completed todos first, then incomplete ones.
//! - every other key: incomplete todos first, then completed ones.
//!
//! ## Within a Bucket
//!
//! | Key | Order |
//! |-----|-------|
//! | `priority` | High, Medium, Low |
//! | `dueDate` | ascending due date |
//! | `title` | locale-style ascending, case-insensitive first |
//! | `category` | locale-style ascending, case-insensitive first |
//! | `completed` | ascending due date |
//!
//! `title` and `category` compare lowercased text by code point, with no
//! collation tables. Accented letters therefore sort after `z` (`"Éclair"`
//! lands after `"Zebra"`), and letters from other scripts follow their
//! Unicode order.
//!
//! Todos without a due date sort after every dated todo of their bucket.
//! The sort is stable: ties keep their incoming relative order, so sorting an
//! already sorted list is a no-op.

use crate::error::{Result, TickError};
use crate::model::Todo;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Priority,
    DueDate,
    Title,
    Category,
    Completed,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Priority,
        SortKey::DueDate,
        SortKey::Title,
        SortKey::Category,
        SortKey::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::DueDate => "dueDate",
            SortKey::Title => "title",
            SortKey::Category => "category",
            SortKey::Completed => "completed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TickError::Validation(format!("unknown sort key '{}'", s)))
    }
}

/// Return a sorted copy of `todos`.
pub fn sort(todos: &[Todo], key: SortKey) -> Vec<Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key));
    sorted
}

/// The comparator behind [`sort`].
pub fn compare(a: &Todo, b: &Todo, key: SortKey) -> Ordering {
    if key == SortKey::Completed {
        return b
            .completed
            .cmp(&a.completed)
            .then_with(|| compare_due(a, b));
    }

    a.completed.cmp(&b.completed).then_with(|| match key {
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortKey::DueDate => compare_due(a, b),
        SortKey::Title => locale_compare(&a.title, &b.title),
        SortKey::Category => locale_compare(a.category.as_str(), b.category.as_str()),
        SortKey::Completed => Ordering::Equal,
    })
}

fn compare_due(a: &Todo, b: &Todo) -> Ordering {
    match (&a.due_date, &b.due_date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive comparison; on a case-only difference lowercase wins.
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};
    use chrono::NaiveDateTime;

    fn todo(title: &str, priority: Priority, due: Option<&str>, completed: bool) -> Todo {
        Todo {
            id: title.to_string(),
            title: title.to_string(),
            category: Category::Personal,
            priority,
            due_date: due.map(|d| NaiveDateTime::parse_from_str(d, "%Y-%m-%dT%H:%M").unwrap()),
            completed,
            elapsed_time: 0,
        }
    }

    fn ids(list: &[Todo]) -> Vec<&str> {
        list.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn accented_titles_sort_by_code_point() {
        let list = vec![
            todo("Éclair", Priority::Low, None, false),
            todo("Zebra", Priority::Low, None, false),
            todo("apple", Priority::Low, None, false),
        ];
        assert_eq!(
            ids(&sort(&list, SortKey::Title)),
            vec!["apple", "Zebra", "Éclair"]
        );
    }

    #[test]
    fn priority_high_first() {
        let list = vec![
            todo("low", Priority::Low, None, false),
            todo("high", Priority::High, None, false),
            todo("medium", Priority::Medium, None, false),
        ];
        assert_eq!(
            ids(&sort(&list, SortKey::Priority)),
            vec!["high", "medium", "low"]
        );
    }

    #[test]
    fn completed_sinks_for_regular_keys() {
        let list = vec![
            todo("done-high", Priority::High, None, true),
            todo("open-low", Priority::Low, None, false),
        ];
        for key in [
            SortKey::Priority,
            SortKey::DueDate,
            SortKey::Title,
            SortKey::Category,
        ] {
            assert_eq!(ids(&sort(&list, key)), vec!["open-low", "done-high"]);
        }
    }

    #[test]
    fn completed_key_floats_completed_then_orders_by_due() {
        let list = vec![
            todo("open-late", Priority::Low, Some("2024-06-02T10:00"), false),
            todo("done-late", Priority::Low, Some("2024-06-03T10:00"), true),
            todo("open-early", Priority::Low, Some("2024-06-01T10:00"), false),
            todo("done-early", Priority::Low, Some("2024-05-01T10:00"), true),
        ];
        assert_eq!(
            ids(&sort(&list, SortKey::Completed)),
            vec!["done-early", "done-late", "open-early", "open-late"]
        );
    }

    #[test]
    fn due_date_ascending_with_undated_last() {
        let list = vec![
            todo("none", Priority::Low, None, false),
            todo("later", Priority::Low, Some("2024-06-02T10:00"), false),
            todo("sooner", Priority::Low, Some("2024-06-01T09:00"), false),
        ];
        assert_eq!(
            ids(&sort(&list, SortKey::DueDate)),
            vec!["sooner", "later", "none"]
        );
    }

    #[test]
    fn title_is_case_insensitive() {
        let list = vec![
            todo("banana", Priority::Low, None, false),
            todo("Apple", Priority::Low, None, false),
            todo("cherry", Priority::Low, None, false),
        ];
        assert_eq!(
            ids(&sort(&list, SortKey::Title)),
            vec!["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn lowercase_wins_case_only_tie() {
        assert_eq!(locale_compare("apple", "Apple"), Ordering::Less);
        assert_eq!(locale_compare("Apple", "apple"), Ordering::Greater);
    }

    #[test]
    fn category_order() {
        let mut work = todo("w", Priority::Low, None, false);
        work.category = Category::Work;
        let mut chores = todo("c", Priority::Low, None, false);
        chores.category = Category::Chores;
        let mut garden = todo("g", Priority::Low, None, false);
        garden.category = Category::Other("garden".into());

        assert_eq!(
            ids(&sort(&[work, chores, garden], SortKey::Category)),
            vec!["c", "g", "w"]
        );
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let list = vec![
            todo("m1", Priority::Medium, None, false),
            todo("h1", Priority::High, None, false),
            todo("m2", Priority::Medium, None, false),
            todo("h2", Priority::High, None, true),
            todo("h3", Priority::High, None, false),
        ];
        for key in SortKey::ALL {
            let once = sort(&list, key);
            let twice = sort(&once, key);
            assert_eq!(once, twice, "key {}", key);
        }
        assert_eq!(
            ids(&sort(&list, SortKey::Priority)),
            vec!["h1", "h3", "m1", "m2", "h2"]
        );
    }

    #[test]
    fn sort_key_parses_from_wire_names() {
        assert_eq!("dueDate".parse::<SortKey>().unwrap(), SortKey::DueDate);
        assert_eq!("completed".parse::<SortKey>().unwrap(), SortKey::Completed);
        assert!("size".parse::<SortKey>().is_err());
    }
}
