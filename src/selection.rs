use crate::model::Todo;
use std::collections::HashSet;

/// Ids the user has marked for a bulk action.
///
/// The selection is transient and never persisted. Ids that do not resolve to
/// an active todo are tolerated here and ignored by bulk operations.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: &str, selected: bool) {
        if selected {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    /// Select every active todo, or clear the selection when it already has
    /// as many entries as the active list.
    pub fn toggle_all(&mut self, active: &[Todo]) {
        if self.ids.len() == active.len() {
            self.ids.clear();
        } else {
            self.ids = active.iter().map(|t| t.id.clone()).collect();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids that resolve to an active todo matching `eligible`, in
    /// active-list order.
    pub fn eligible<F>(&self, active: &[Todo], eligible: F) -> Vec<String>
    where
        F: Fn(&Todo) -> bool,
    {
        active
            .iter()
            .filter(|t| self.ids.contains(&t.id) && eligible(t))
            .map(|t| t.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};

    fn todos(n: usize) -> Vec<Todo> {
        (0..n)
            .map(|i| {
                Todo::new(&format!("T{}", i), Category::Work, Priority::Low, None).unwrap()
            })
            .collect()
    }

    #[test]
    fn select_and_deselect() {
        let mut selection = Selection::new();
        selection.select("a", true);
        selection.select("a", true);
        assert_eq!(selection.len(), 1);
        selection.select("a", false);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let list = todos(3);
        let mut selection = Selection::new();
        selection.select(&list[0].id, true);

        selection.toggle_all(&list);
        assert_eq!(selection.len(), 3);

        selection.toggle_all(&list);
        assert!(selection.is_empty());
    }

    #[test]
    fn eligible_ignores_unknown_ids_and_follows_list_order() {
        let list = todos(3);
        let mut selection = Selection::new();
        selection.select(&list[2].id, true);
        selection.select("ghost", true);
        selection.select(&list[0].id, true);

        assert_eq!(
            selection.eligible(&list, |_| true),
            vec![list[0].id.clone(), list[2].id.clone()]
        );
    }
}
