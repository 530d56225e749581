mod support;

use chrono::{Duration, Local, NaiveDateTime};
use support::{api, fixed_now};
use ticktrack::model::{Category, Priority};
use ticktrack::reminders::ReminderKind;
use tokio::sync::mpsc;

fn local_fixed_now() -> NaiveDateTime {
    fixed_now().with_timezone(&Local).naive_local()
}

#[tokio::test(start_paused = true)]
async fn test_scanner_reads_published_snapshots() {
    let mut api = api();
    let (events, mut received) = mpsc::unbounded_channel();
    let handle = api.spawn_reminders(events);

    let due = local_fixed_now() + Duration::minutes(3);
    api.create_todo("Stand-up", Category::Work, Priority::High, Some(due))
        .unwrap();
    tokio::time::advance(std::time::Duration::from_secs(60)).await;

    let reminder = received.recv().await.unwrap();
    assert_eq!(reminder.title, "Stand-up");
    assert_eq!(reminder.kind, ReminderKind::DueSoon);
    assert_eq!(reminder.minutes, 3);
    assert_eq!(reminder.headline(), "Todo Reminder: Stand-up");

    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_scanner_uses_api_clock() {
    let mut api = api();
    // Days away on the API clock, long past on the wall clock.
    let due = local_fixed_now() + Duration::days(2);
    api.create_todo("Later", Category::Work, Priority::Low, Some(due))
        .unwrap();
    assert!(api.reminders_now().is_empty());

    let (events, mut received) = mpsc::unbounded_channel();
    let handle = api.spawn_reminders(events);
    tokio::time::advance(std::time::Duration::from_secs(60)).await;
    handle.stop().await;

    assert!(received.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_completed_todos_are_not_reminded() {
    let mut api = api();
    let due = local_fixed_now() + Duration::minutes(1);
    let id = api
        .create_todo("Quick", Category::Chores, Priority::Low, Some(due))
        .unwrap()
        .affected_todos[0]
        .id
        .clone();
    api.toggle_completed(&id).unwrap();

    let (events, mut received) = mpsc::unbounded_channel();
    let handle = api.spawn_reminders(events);
    tokio::time::advance(std::time::Duration::from_secs(60)).await;
    handle.stop().await;

    assert!(received.recv().await.is_none());
}
