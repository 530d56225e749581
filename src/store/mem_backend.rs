use super::backend::StorageBackend;
use super::Scope;
use crate::error::{Result, TickError};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the engine is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<(Scope, String), String>>,
    simulate_write_error: RefCell<bool>,
    write_budget: RefCell<Option<usize>>,
    fail_after: RefCell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Let the next `writes` calls to `set` succeed and fail every one after.
    /// `None` lifts the limit.
    pub fn set_write_budget(&self, writes: Option<usize>) {
        *self.write_budget.borrow_mut() = writes;
    }

    /// Let `writes` calls to `set` succeed, fail the next one, then recover.
    pub fn fail_once_after(&self, writes: usize) {
        *self.fail_after.borrow_mut() = Some(writes);
    }

    /// Number of keys currently held in `scope`.
    pub fn len(&self, scope: Scope) -> usize {
        self.values
            .borrow()
            .keys()
            .filter(|(s, _)| *s == scope)
            .count()
    }

    pub fn is_empty(&self, scope: Scope) -> bool {
        self.len(scope) == 0
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let values = self.values.borrow();
        Ok(values.get(&(scope, key.to_string())).cloned())
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(TickError::Store("Simulated write error".to_string()));
        }
        if let Some(budget) = self.write_budget.borrow_mut().as_mut() {
            if *budget == 0 {
                return Err(TickError::Store("Write budget exhausted".to_string()));
            }
            *budget -= 1;
        }
        {
            let mut fail_after = self.fail_after.borrow_mut();
            if let Some(remaining) = *fail_after {
                if remaining == 0 {
                    *fail_after = None;
                    return Err(TickError::Store("Simulated write error".to_string()));
                }
                *fail_after = Some(remaining - 1);
            }
        }
        let mut values = self.values.borrow_mut();
        values.insert((scope, key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        let mut values = self.values.borrow_mut();
        values.remove(&(scope, key.to_string()));
        Ok(())
    }

    fn clear(&self, scope: Scope) -> Result<()> {
        let mut values = self.values.borrow_mut();
        values.retain(|(s, _), _| *s != scope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let backend = MemBackend::new();
        backend.set(Scope::Durable, "user", "durable").unwrap();
        backend.set(Scope::Session, "user", "session").unwrap();

        backend.clear(Scope::Session).unwrap();

        assert_eq!(backend.get(Scope::Session, "user").unwrap(), None);
        assert_eq!(
            backend.get(Scope::Durable, "user").unwrap().as_deref(),
            Some("durable")
        );
    }

    #[test]
    fn simulated_write_error_surfaces() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        assert!(matches!(
            backend.set(Scope::Durable, "todos", "[]"),
            Err(TickError::Store(_))
        ));
        assert!(backend.is_empty(Scope::Durable));
    }

    #[test]
    fn write_budget_runs_out() {
        let backend = MemBackend::new();
        backend.set_write_budget(Some(1));
        backend.set(Scope::Durable, "todos", "[]").unwrap();
        assert!(backend.set(Scope::Durable, "todos", "[1]").is_err());
        assert_eq!(
            backend.get(Scope::Durable, "todos").unwrap().as_deref(),
            Some("[]")
        );

        backend.set_write_budget(None);
        backend.set(Scope::Durable, "todos", "[1]").unwrap();
    }

    #[test]
    fn fail_once_after_recovers() {
        let backend = MemBackend::new();
        backend.fail_once_after(1);
        backend.set(Scope::Durable, "a", "1").unwrap();
        assert!(backend.set(Scope::Durable, "b", "2").is_err());
        backend.set(Scope::Durable, "b", "3").unwrap();
        assert_eq!(backend.len(Scope::Durable), 2);
    }
}
