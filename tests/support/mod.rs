#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::rc::Rc;
use std::sync::Once;
use ticktrack::api::TickApi;
use ticktrack::config::TickConfig;
use ticktrack::identity::{Credentials, LocalIdentity};
use ticktrack::model::{Category, Priority, Todo};
use ticktrack::store::mem_backend::MemBackend;
use ticktrack::store::TodoStore;

pub type MemApi = TickApi<MemBackend, LocalIdentity<MemBackend>>;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn fixed_now() -> DateTime<Utc> {
    "2024-05-01T12:00:00Z".parse().unwrap()
}

/// An API over a fresh in-memory backend with a frozen clock.
pub fn api() -> MemApi {
    init_tracing();
    let backend = Rc::new(MemBackend::new());
    let identity = LocalIdentity::new(Rc::clone(&backend));
    let store = TodoStore::with_backend(backend);
    TickApi::new(store, identity, TickConfig::default()).with_clock(fixed_now)
}

/// Same as [`api`], with a registered and logged-in user. Returns the user id.
pub fn logged_in_api(email: &str) -> (MemApi, String) {
    let mut api = api();
    let user = api.identity().signup("Tester", email, "secret").unwrap();
    api.login(&Credentials::new(email, "secret")).unwrap();
    (api, user.id)
}

pub fn add(api: &mut MemApi, title: &str, priority: Priority) -> String {
    api.create_todo(title, Category::Work, priority, None)
        .unwrap()
        .affected_todos[0]
        .id
        .clone()
}

pub fn titles(list: &[Todo]) -> Vec<String> {
    list.iter().map(|t| t.title.clone()).collect()
}
