//! # Domain Model
//!
//! This module defines the core record of ticktrack, [`Todo`], along with its
//! field types [`Category`] and [`Priority`], and the input shapes used by the
//! command layer ([`TodoUpdate`]).
//!
//! ## Persisted Shape
//!
//! Todos are stored and exchanged as JSON objects with camelCase keys:
//!
//! ```text
//! {
//!   "id": "6f1c…",            opaque, unique across active and archived lists
//!   "title": "Water plants",  non-empty
//!   "category": "Chores",     open set, unknown values kept verbatim
//!   "priority": "High",       Low | Medium | High
//!   "dueDate": "2024-05-01T14:30",  local date-time, "" when absent
//!   "completed": false,
//!   "elapsedTime": 0          seconds accumulated by the work timer
//! }
//! ```
//!
//! ## Coercion
//!
//! Data coming from outside the engine (persisted blobs, transfer documents)
//! is never trusted as-is. [`Todo::from_value`] validates a loose JSON record
//! and coerces it into the strict shape:
//!
//! - `id` and `title` must be non-empty strings, otherwise the record is rejected.
//! - Missing `category` becomes `Personal`; unknown `priority` becomes `Medium`.
//! - Unparseable or empty `dueDate` becomes "no due date".
//! - Non-boolean `completed` is `false`; negative or fractional `elapsedTime` is `0`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, TickError};

const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DUE_DATE_FORMAT_SECS: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank: High sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(TickError::Validation(format!("unknown priority '{}'", other))),
        }
    }
}

/// Todo category. The three well-known values get their own variants, anything
/// else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Chores,
    Work,
    #[default]
    Personal,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Chores => "Chores",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Other(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "Chores" => Category::Chores,
            "Work" => Category::Work,
            "Personal" => Category::Personal,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::from(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "due_date_serde")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub elapsed_time: u64,
}

impl Todo {
    /// Build a fresh, incomplete todo with a newly generated id.
    pub fn new(
        title: &str,
        category: Category,
        priority: Priority,
        due_date: Option<NaiveDateTime>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: validate_title(title)?,
            category,
            priority,
            due_date: truncate_due_date(due_date),
            completed: false,
            elapsed_time: 0,
        })
    }

    /// Coerce a loose JSON record into a `Todo`.
    ///
    /// Returns the reason as `Err` when the record lacks an identity or a title
    /// and has to be quarantined.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or_else(|| "record is not an object".to_string())?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("record has no id".to_string()),
        };

        let title = match obj.get("title").and_then(Value::as_str) {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => return Err(format!("record {} has no title", id)),
        };

        let category = obj
            .get("category")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(Category::from)
            .unwrap_or_default();

        let priority = obj
            .get("priority")
            .and_then(Value::as_str)
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();

        let due_date = obj
            .get("dueDate")
            .and_then(Value::as_str)
            .and_then(parse_due_date);

        let completed = obj
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let elapsed_time = obj
            .get("elapsedTime")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok(Self {
            id,
            title,
            category,
            priority,
            due_date,
            completed,
            elapsed_time,
        })
    }
}

/// Full replacement of a todo's mutable fields.
///
/// Updates are all-or-nothing: callers resupply unchanged fields. The one
/// exception is `elapsed_time`, where `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub elapsed_time: Option<u64>,
}

impl TodoUpdate {
    /// Start from the current state of `todo`, keeping its elapsed time.
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            category: todo.category.clone(),
            priority: todo.priority,
            due_date: todo.due_date,
            completed: todo.completed,
            elapsed_time: None,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_elapsed_time(mut self, seconds: u64) -> Self {
        self.elapsed_time = Some(seconds);
        self
    }
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TickError::Validation("title must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a due date in any of the shapes the engine has to accept:
/// RFC 3339 (converted to local time), `YYYY-MM-DDTHH:MM[:SS]` or a bare
/// `YYYY-MM-DD` (midnight). Sub-second precision is dropped.
pub fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, DUE_DATE_FORMAT_SECS).ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, DUE_DATE_FORMAT).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    parsed.with_nanosecond(0)
}

/// Due dates are kept at whole-second precision so they survive a trip
/// through their text form.
pub(crate) fn truncate_due_date(due: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    due.and_then(|d| d.with_nanosecond(0))
}

pub fn format_due_date(due: &NaiveDateTime) -> String {
    if due.second() == 0 {
        due.format(DUE_DATE_FORMAT).to_string()
    } else {
        due.format(DUE_DATE_FORMAT_SECS).to_string()
    }
}

mod due_date_serde {
    use super::{format_due_date, parse_due_date};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(due) => serializer.serialize_str(&format_due_date(due)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_due_date))
    }
}
