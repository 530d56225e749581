//! # Reminder Scanner
//!
//! Periodically scans the active list for todos whose due time is near and
//! emits [`Reminder`] events. The scanner never mutates state: it reads
//! snapshots of the active list published by the API on a `watch` channel and
//! pushes events onto an `mpsc` channel for whatever notification layer is
//! listening.
//!
//! ## Window
//!
//! With `diff = due - now` and a window `w` (5 minutes by default):
//!
//! - `0 < diff <= w`  → [`ReminderKind::DueSoon`]
//! - `-w < diff <= 0` → [`ReminderKind::Overdue`]
//!
//! Completed todos, undated todos and todos outside the window produce nothing.
//! Every tick re-emits for todos still in the window; de-duplication belongs to
//! the consumer.
//!
//! ## Lifecycle
//!
//! [`ReminderScanner::spawn`] runs the scanner as a tokio task and returns a
//! [`ReminderHandle`]. Stopping the handle (or dropping it) ends the task. The
//! task also ends on its own when the event receiver goes away.

use crate::model::{format_due_date, Category, Todo};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderKind {
    DueSoon,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub todo_id: String,
    pub title: String,
    pub category: Category,
    pub due_date: NaiveDateTime,
    pub kind: ReminderKind,
    /// Minutes until due (rounded up) for `DueSoon`, minutes past due
    /// (rounded down) for `Overdue`.
    pub minutes: i64,
}

impl Reminder {
    pub fn headline(&self) -> String {
        format!("Todo Reminder: {}", self.title)
    }

    pub fn body(&self) -> String {
        let when = match self.kind {
            ReminderKind::DueSoon => format!("due in {} min", self.minutes),
            ReminderKind::Overdue => format!("overdue by {} min", self.minutes),
        };
        format!(
            "Due: {} ({})\nCategory: {}",
            format_due_date(&self.due_date),
            when,
            self.category
        )
    }
}

/// Scan `todos` once at `now`.
pub fn scan(todos: &[Todo], now: NaiveDateTime, window: chrono::Duration) -> Vec<Reminder> {
    todos
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|t| {
            let due = t.due_date?;
            let diff = due - now;
            let zero = chrono::Duration::zero();

            let (kind, minutes) = if diff > zero && diff <= window {
                let secs = diff.num_seconds();
                (ReminderKind::DueSoon, (secs + 59) / 60)
            } else if diff <= zero && diff > -window {
                (ReminderKind::Overdue, (-diff).num_minutes())
            } else {
                return None;
            };

            Some(Reminder {
                todo_id: t.id.clone(),
                title: t.title.clone(),
                category: t.category.clone(),
                due_date: due,
                kind,
                minutes,
            })
        })
        .collect()
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub struct ReminderScanner {
    todos: watch::Receiver<Vec<Todo>>,
    events: mpsc::UnboundedSender<Reminder>,
    period: Duration,
    window: chrono::Duration,
    clock: Clock,
}

impl ReminderScanner {
    pub fn new(
        todos: watch::Receiver<Vec<Todo>>,
        events: mpsc::UnboundedSender<Reminder>,
        period: Duration,
        window: chrono::Duration,
    ) -> Self {
        Self {
            todos,
            events,
            period,
            window,
            clock: Box::new(|| Local::now().naive_local()),
        }
    }

    /// Replace the wall clock, for tests.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Run one scan against the latest snapshot and emit the results.
    /// Returns `false` once nobody is listening for events anymore.
    pub fn tick(&self) -> bool {
        let now = (self.clock)();
        let reminders = scan(&self.todos.borrow(), now, self.window);
        debug!(count = reminders.len(), "reminder tick");
        reminders
            .into_iter()
            .all(|reminder| self.events.send(reminder).is_ok())
            && !self.events.is_closed()
    }

    /// Scan immediately, then every period, until `shutdown` flips to `true`
    /// or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(period = ?self.period, "starting reminder scanner");
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.tick() {
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("reminder scanner stopped");
    }

    pub fn spawn(self) -> ReminderHandle {
        let (shutdown, signal) = watch::channel(false);
        let task = tokio::spawn(self.run(signal));
        ReminderHandle { shutdown, task }
    }
}

/// Cancellation handle for a spawned [`ReminderScanner`].
pub struct ReminderHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReminderHandle {
    /// Signal the scanner and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn todo(id: &str, due: Option<&str>, completed: bool) -> Todo {
        Todo {
            id: id.to_string(),
            title: format!("Task {}", id),
            category: Category::Work,
            priority: Priority::Medium,
            due_date: due.map(at),
            completed,
            elapsed_time: 0,
        }
    }

    fn window() -> chrono::Duration {
        chrono::Duration::minutes(5)
    }

    #[test]
    fn classifies_by_window() {
        let now = at("2024-05-01T12:00:00");
        let todos = vec![
            todo("soon", Some("2024-05-01T12:03:00"), false),
            todo("edge-soon", Some("2024-05-01T12:05:00"), false),
            todo("far", Some("2024-05-01T12:05:01"), false),
            todo("now", Some("2024-05-01T12:00:00"), false),
            todo("late", Some("2024-05-01T11:56:30"), false),
            todo("edge-late", Some("2024-05-01T11:55:00"), false),
            todo("done", Some("2024-05-01T12:01:00"), true),
            todo("undated", None, false),
        ];

        let found: Vec<(String, ReminderKind, i64)> = scan(&todos, now, window())
            .into_iter()
            .map(|r| (r.todo_id, r.kind, r.minutes))
            .collect();

        assert_eq!(
            found,
            vec![
                ("soon".to_string(), ReminderKind::DueSoon, 3),
                ("edge-soon".to_string(), ReminderKind::DueSoon, 5),
                ("now".to_string(), ReminderKind::Overdue, 0),
                ("late".to_string(), ReminderKind::Overdue, 3),
            ]
        );
    }

    #[test]
    fn due_soon_minutes_round_up() {
        let now = at("2024-05-01T12:00:00");
        let todos = vec![todo("a", Some("2024-05-01T12:00:30"), false)];
        let reminders = scan(&todos, now, window());
        assert_eq!(reminders[0].minutes, 1);
        assert!(reminders[0].body().contains("due in 1 min"));
        assert_eq!(reminders[0].headline(), "Todo Reminder: Task a");
    }

    #[tokio::test(start_paused = true)]
    async fn scanner_emits_each_tick_until_stopped() {
        let now = at("2024-05-01T12:00:00");
        let (_publish, snapshot) =
            watch::channel(vec![todo("a", Some("2024-05-01T12:02:00"), false)]);
        let (events, mut received) = mpsc::unbounded_channel();

        let handle = ReminderScanner::new(snapshot, events, Duration::from_secs(60), window())
            .with_clock(move || now)
            .spawn();

        let first = received.recv().await.unwrap();
        assert_eq!(first.kind, ReminderKind::DueSoon);

        tokio::time::advance(Duration::from_secs(60)).await;
        let second = received.recv().await.unwrap();
        assert_eq!(second.todo_id, "a");

        handle.stop().await;
        assert_eq!(received.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn scanner_sees_new_snapshots() {
        let now = at("2024-05-01T12:00:00");
        let (publish, snapshot) = watch::channel(Vec::new());
        let (events, mut received) = mpsc::unbounded_channel();

        let handle = ReminderScanner::new(snapshot, events, Duration::from_secs(60), window())
            .with_clock(move || now)
            .spawn();

        publish
            .send(vec![todo("b", Some("2024-05-01T11:58:00"), false)])
            .unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;

        let reminder = received.recv().await.unwrap();
        assert_eq!(reminder.kind, ReminderKind::Overdue);
        assert_eq!(reminder.minutes, 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_scanner() {
        let (_publish, snapshot) = watch::channel(Vec::<Todo>::new());
        let (events, mut received) = mpsc::unbounded_channel();

        let handle =
            ReminderScanner::new(snapshot, events, Duration::from_secs(60), window()).spawn();
        drop(handle);

        assert_eq!(received.recv().await, None);
    }
}
