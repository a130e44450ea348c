//! Wire types exchanged with the agenda backend.
//!
//! The backend owns these records; the client only keeps transient copies
//! for display and editing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::slot::{CalendarDay, TimeOfDay};

/// Colour used for events that carry none.
pub const DEFAULT_EVENT_COLOR: &str = "#3f51b5";

/// A timed calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Event {
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_EVENT_COLOR)
    }

    pub fn day(&self) -> CalendarDay {
        CalendarDay::of(self.start)
    }
}

/// A to-do item. `date: None` means undated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub date: Option<CalendarDay>,
}

impl Task {
    pub fn is_undated(&self) -> bool {
        self.date.is_none()
    }
}

/// A dated task as it appears on the calendar feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarTask {
    pub id: i64,
    pub title: String,
    pub day: CalendarDay,
    pub done: bool,
}

/// One entry of the combined calendar feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarItem {
    Event(Event),
    Task(CalendarTask),
}

impl CalendarItem {
    pub fn id(&self) -> i64 {
        match self {
            CalendarItem::Event(e) => e.id,
            CalendarItem::Task(t) => t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CalendarItem::Event(e) => &e.title,
            CalendarItem::Task(t) => &t.title,
        }
    }

    pub fn day(&self) -> CalendarDay {
        match self {
            CalendarItem::Event(e) => e.day(),
            CalendarItem::Task(t) => t.day,
        }
    }
}

/// Feed entry as sent by the backend: events and tasks share one shape and
/// are told apart by `isTask`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedEntry {
    id: i64,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(default)]
    all_day: bool,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    is_task: bool,
    #[serde(default)]
    task_done: bool,
}

impl<'de> Deserialize<'de> for CalendarItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FeedEntry::deserialize(deserializer).map(CalendarItem::from)
    }
}

impl From<FeedEntry> for CalendarItem {
    fn from(entry: FeedEntry) -> Self {
        if entry.is_task {
            CalendarItem::Task(CalendarTask {
                id: entry.id,
                title: entry.title,
                day: CalendarDay::of(entry.start),
                done: entry.task_done,
            })
        } else {
            CalendarItem::Event(Event {
                id: entry.id,
                title: entry.title,
                start: entry.start,
                end: entry.end,
                all_day: entry.all_day,
                color: entry.color,
                notes: entry.notes,
            })
        }
    }
}

/// Authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

// Request bodies

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub color: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBatch {
    pub title: String,
    pub start_day: CalendarDay,
    pub end_day: CalendarDay,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub color: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventUpdate {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<CalendarDay>,
}

/// Partial task update. `date: Some(None)` is sent as `null` and clears it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Option<CalendarDay>>,
}

/// Optional `from`/`to` window for the calendar feed, `to` inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedRange {
    pub from: Option<CalendarDay>,
    pub to: Option<CalendarDay>,
}

impl FeedRange {
    pub fn new(from: Option<CalendarDay>, to: Option<CalendarDay>) -> Self {
        FeedRange { from, to }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.from.is_none_or(|f| day >= f) && self.to.is_none_or(|t| day <= t)
    }
}
