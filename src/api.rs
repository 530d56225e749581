//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every ticktrack operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns the transient state**: selection, work timers, the clock
//! - **Resolves identity** for export and import through the [`IdentityProvider`]
//! - **Publishes** a snapshot of the active list after every mutation, which is
//!   what the reminder scanner reads
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation**: Returns `CmdResult`s and plain data, never strings meant
//!   for a terminal
//!
//! ## Generic Over Storage and Identity
//!
//! `TickApi<B, I>` is generic over the storage backend and the identity
//! provider:
//! - Production: `TickApi<FsBackend, LocalIdentity<FsBackend>>`
//! - Testing: `TickApi<MemBackend, LocalIdentity<MemBackend>>`

use crate::commands::transfer::TransferDocument;
use crate::commands::{self, CmdResult};
use crate::config::TickConfig;
use crate::error::Result;
use crate::identity::{Credentials, IdentityProvider, SessionUser};
use crate::model::{Category, Priority, Todo, TodoUpdate};
use crate::ordering::SortKey;
use crate::reminders::{self, Reminder, ReminderHandle, ReminderScanner};
use crate::selection::Selection;
use crate::stats::TaskStats;
use crate::store::{keys, Scope, StorageBackend, TodoStore};
use crate::timer::WorkTimers;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The main API facade for ticktrack operations.
pub struct TickApi<B: StorageBackend, I: IdentityProvider> {
    store: TodoStore<B>,
    identity: I,
    config: TickConfig,
    selection: Selection,
    timers: WorkTimers,
    snapshots: watch::Sender<Vec<Todo>>,
    clock: Clock,
}

impl<B: StorageBackend, I: IdentityProvider> TickApi<B, I> {
    pub fn new(store: TodoStore<B>, identity: I, config: TickConfig) -> Self {
        let (snapshots, _) = watch::channel(store.active().to_vec());
        Self {
            store,
            identity,
            config,
            selection: Selection::new(),
            timers: WorkTimers::new(),
            snapshots,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock, for tests.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &TodoStore<B> {
        &self.store
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn timers(&self) -> &WorkTimers {
        &self.timers
    }

    // --- Todos ---

    pub fn create_todo(
        &mut self,
        title: &str,
        category: Category,
        priority: Priority,
        due_date: Option<NaiveDateTime>,
    ) -> Result<CmdResult> {
        let result = commands::create::run(&mut self.store, title, category, priority, due_date);
        self.publish();
        result
    }

    pub fn get_todo(&self, id: &str) -> Option<&Todo> {
        self.store.get(id)
    }

    pub fn update_todo(&mut self, id: &str, update: TodoUpdate) -> Result<CmdResult> {
        let now = self.now();
        let result = commands::update::run(&mut self.store, &mut self.timers, id, update, now);
        self.publish();
        result
    }

    pub fn toggle_completed(&mut self, id: &str) -> Result<CmdResult> {
        let now = self.now();
        let result = commands::update::toggle_completed(&mut self.store, &mut self.timers, id, now);
        self.publish();
        result
    }

    pub fn remove_todo(&mut self, id: &str) -> Result<CmdResult> {
        let result = commands::delete::run(&mut self.store, &mut self.timers, id);
        self.selection.select(id, false);
        self.publish();
        result
    }

    pub fn archive_todo(&mut self, id: &str) -> Result<CmdResult> {
        let result = commands::archive::run(&mut self.store, id);
        self.publish();
        result
    }

    pub fn restore_todo(&mut self, id: &str) -> Result<CmdResult> {
        let result = commands::restore::run(&mut self.store, id);
        self.publish();
        result
    }

    pub fn delete_archived(&mut self, id: &str) -> Result<CmdResult> {
        commands::delete::run_archived(&mut self.store, id)
    }

    pub fn reorder(&mut self, dragged_id: &str, target_id: &str) -> Result<CmdResult> {
        let result = commands::reorder::run(&mut self.store, dragged_id, target_id);
        self.publish();
        result
    }

    /// The active list sorted by `key`, or by the configured default.
    pub fn list_todos(&self, key: Option<SortKey>) -> CmdResult {
        let key = key.unwrap_or_else(|| self.config.default_sort());
        commands::list::active(&self.store, key)
    }

    pub fn list_archived(&self, key: Option<SortKey>) -> CmdResult {
        let key = key.unwrap_or_else(|| self.config.default_sort());
        commands::list::archived(&self.store, key)
    }

    // --- Selection and bulk actions ---

    pub fn select(&mut self, id: &str, selected: bool) {
        self.selection.select(id, selected);
    }

    pub fn select_all(&mut self) {
        self.selection.toggle_all(self.store.active());
    }

    pub fn bulk_complete(&mut self) -> Result<CmdResult> {
        let now = self.now();
        let result =
            commands::bulk::complete(&mut self.store, &mut self.selection, &mut self.timers, now);
        self.publish();
        result
    }

    pub fn bulk_delete(&mut self) -> Result<CmdResult> {
        let result = commands::bulk::delete(&mut self.store, &mut self.selection, &mut self.timers);
        self.publish();
        result
    }

    pub fn bulk_archive(&mut self) -> Result<CmdResult> {
        let result = commands::bulk::archive(&mut self.store, &mut self.selection);
        self.publish();
        result
    }

    pub fn drop_on_delete(&mut self, dragged: Option<&str>) -> Result<CmdResult> {
        let result = commands::drop_zones::on_delete(
            &mut self.store,
            &mut self.selection,
            &mut self.timers,
            dragged,
        );
        self.publish();
        result
    }

    pub fn drop_on_done(&mut self, dragged: Option<&str>) -> Result<CmdResult> {
        let now = self.now();
        let result = commands::drop_zones::on_done(
            &mut self.store,
            &mut self.selection,
            &mut self.timers,
            dragged,
            now,
        );
        self.publish();
        result
    }

    // --- Work timers ---

    pub fn start_timer(&mut self, id: &str) -> bool {
        let now = self.now();
        self.timers.start(&self.store, id, now)
    }

    pub fn stop_timer(&mut self, id: &str) -> Result<Option<u64>> {
        let now = self.now();
        let flushed = self.timers.stop(&mut self.store, id, now);
        self.publish();
        flushed
    }

    /// Seconds worked on a todo, including a running stretch.
    pub fn elapsed(&self, id: &str) -> Option<u64> {
        self.timers.elapsed(&self.store, id, self.now())
    }

    // --- Statistics and reminders ---

    pub fn stats(&self) -> TaskStats {
        TaskStats::compute(self.store.active(), self.local_now())
    }

    /// One reminder scan against the current active list.
    pub fn reminders_now(&self) -> Vec<Reminder> {
        reminders::scan(
            self.store.active(),
            self.local_now(),
            self.config.reminder_window(),
        )
    }

    /// Receiver of the active-list snapshots published after each mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Todo>> {
        self.snapshots.subscribe()
    }

    /// Spawn the periodic reminder scanner on the current tokio runtime.
    ///
    /// The scanner reads the same clock as the rest of the API.
    pub fn spawn_reminders(&self, events: mpsc::UnboundedSender<Reminder>) -> ReminderHandle {
        let clock = Arc::clone(&self.clock);
        ReminderScanner::new(
            self.subscribe(),
            events,
            self.config.reminder_interval(),
            self.config.reminder_window(),
        )
        .with_clock(move || clock().with_timezone(&Local).naive_local())
        .spawn()
    }

    // --- Transfer ---

    pub fn export(&self) -> Result<TransferDocument> {
        let user_id = self.identity.current_user_id();
        commands::transfer::export(&self.store, user_id.as_deref(), self.now())
    }

    pub fn export_json(&self) -> Result<String> {
        let user_id = self.identity.current_user_id();
        commands::transfer::export_json(&self.store, user_id.as_deref(), self.now())
    }

    pub fn export_filename(&self) -> String {
        commands::transfer::export_filename(self.now())
    }

    pub fn import_json(&mut self, raw: &str) -> Result<CmdResult> {
        let user_id = self.identity.current_user_id();
        let result = commands::transfer::import_json(&mut self.store, raw, user_id.as_deref())?;
        self.after_import();
        Ok(result)
    }

    pub fn import_value(&mut self, document: &Value) -> Result<CmdResult> {
        let user_id = self.identity.current_user_id();
        let result = commands::transfer::import(&mut self.store, document, user_id.as_deref())?;
        self.after_import();
        Ok(result)
    }

    // --- Session ---

    pub fn login(&mut self, credentials: &Credentials) -> Result<SessionUser> {
        self.identity.login(credentials)
    }

    /// End the session: timers and the selection are dropped, the todos stay.
    pub fn logout(&mut self) -> Result<()> {
        self.timers.cancel_all();
        self.selection.clear();
        self.identity.logout()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.identity.current_user()
    }

    pub fn dark_mode(&self) -> Result<bool> {
        let raw = self.store.backend().get(Scope::Durable, keys::DARK_MODE)?;
        Ok(raw.as_deref() == Some("true"))
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        let value = if enabled { "true" } else { "false" };
        self.store
            .backend()
            .set(Scope::Durable, keys::DARK_MODE, value)
    }

    /// Runs only after a successful import; a refused document changes nothing.
    fn after_import(&mut self) {
        // Timers only survive on todos that are still active and open.
        let stale: Vec<String> = self
            .timers
            .running_ids()
            .filter(|id| !self.store.get(id).is_some_and(|t| !t.completed))
            .map(str::to_string)
            .collect();
        for id in &stale {
            self.timers.cancel(id);
        }
        self.selection.clear();
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.store.active().to_vec());
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }
}
