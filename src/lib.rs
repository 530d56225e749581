//! # ticktrack Architecture
//!
//! ticktrack is the **lifecycle engine of a personal todo tracker**: the data
//! model, the transitions between active, completed and archived todos, the
//! display ordering, selection-wide actions, import/export and due-date
//! reminders. Rendering, routing and notification chrome live elsewhere.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns selection, work timers, the clock, identity         │
//! │  - Publishes active-list snapshots for the reminder scanner │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Lifecycle rules, eligibility filters, transfer checks    │
//! │  - Returns CmdResult with affected todos and messages       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - TodoStore: the two lists and their invariants            │
//! │  - StorageBackend trait: FsBackend, MemBackend (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Beside the layers sit the pure engines: [`ordering`] (sorting),
//! [`selection`], [`timer`] (work timers), [`stats`] and [`reminders`] (the
//! periodic scanner, the only async piece).
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It
//! never prints, never exits the process and never reads the clock on its
//! own: commands receive `now` from the API.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation group
//! - [`store`]: Storage abstraction, backends and the todo store
//! - [`model`]: Core data types (`Todo`, `Priority`, `Category`)
//! - [`identity`]: Identity provider seam and the local provider
//! - [`config`]: Configuration management
//! - [`init`]: Wiring of config, filesystem storage and identity
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod identity;
pub mod init;
pub mod model;
pub mod ordering;
pub mod reminders;
pub mod selection;
pub mod stats;
pub mod store;
pub mod timer;

#[cfg(test)]
mod test_utils;
