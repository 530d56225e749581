//! # Work Timers
//!
//! Each todo can have one running work timer. Rather than ticking a counter
//! every second, a running timer remembers when it started; the accumulated
//! seconds are computed on demand and written into the todo's `elapsedTime`
//! when the timer stops.
//!
//! ## Flush Rules
//!
//! - `stop` flushes `elapsedTime + (now - started)` into the store.
//! - A transition to completed writes the flushed total together with the
//!   completion (see [`WorkTimers::pending_totals`]) and cancels the timer only
//!   once that write went through.
//! - Removing a todo cancels its timer without flushing, there is nothing left
//!   to flush into.
//! - Logging out cancels every timer.

use crate::error::Result;
use crate::model::TodoUpdate;
use crate::store::{StorageBackend, TodoStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct WorkTimers {
    running: HashMap<String, DateTime<Utc>>,
}

impl WorkTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing an active, incomplete todo. Returns whether a timer was
    /// started.
    pub fn start<B: StorageBackend>(
        &mut self,
        store: &TodoStore<B>,
        id: &str,
        now: DateTime<Utc>,
    ) -> bool {
        match store.get(id) {
            Some(todo) if !todo.completed && !self.running.contains_key(id) => {
                debug!(id, "work timer started");
                self.running.insert(id.to_string(), now);
                true
            }
            _ => false,
        }
    }

    /// Stop a running timer and flush its seconds into the store.
    /// Returns the new `elapsedTime`, or `None` if no timer was running.
    pub fn stop<B: StorageBackend>(
        &mut self,
        store: &mut TodoStore<B>,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<u64>> {
        let Some(started) = self.running.get(id).copied() else {
            return Ok(None);
        };
        let Some(todo) = store.get(id) else {
            self.running.remove(id);
            return Ok(None);
        };

        let total = todo.elapsed_time + seconds_between(started, now);
        let update = TodoUpdate::from_todo(todo).with_elapsed_time(total);
        store.update(id, update)?;
        self.running.remove(id);
        debug!(id, total, "work timer flushed");
        Ok(Some(total))
    }

    /// The totals the running timers among `ids` would flush at `now`.
    /// Nothing is written and no timer stops.
    pub fn pending_totals<B: StorageBackend>(
        &self,
        store: &TodoStore<B>,
        ids: &[String],
        now: DateTime<Utc>,
    ) -> HashMap<String, u64> {
        ids.iter()
            .filter(|id| self.is_running(id))
            .filter_map(|id| store.get(id).map(|todo| (id.clone(), todo)))
            .map(|(id, todo)| {
                let started = self.running[&id];
                (id, todo.elapsed_time + seconds_between(started, now))
            })
            .collect()
    }

    /// Drop a timer without flushing.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.running.remove(id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.running.clear();
    }

    pub fn is_running(&self, id: &str) -> bool {
        self.running.contains_key(id)
    }

    pub fn running_ids(&self) -> impl Iterator<Item = &str> {
        self.running.keys().map(String::as_str)
    }

    /// Seconds to display for a todo: stored elapsed time plus the running
    /// stretch, if any.
    pub fn elapsed<B: StorageBackend>(
        &self,
        store: &TodoStore<B>,
        id: &str,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        let todo = store.get(id).or_else(|| store.get_archived(id))?;
        let running = self
            .running
            .get(id)
            .map(|started| seconds_between(*started, now))
            .unwrap_or(0);
        Some(todo.elapsed_time + running)
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_seconds()).unwrap_or(0)
}

/// Format seconds as `HH:MM:SS`.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
