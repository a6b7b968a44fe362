use crate::components::suggestion::EventDraft;
use crate::error::{invalid_input, AppResult};
use crate::utils::time::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored calendar event, in the `calendar_events` row shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

/// Event fields accepted from clients when creating or updating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

impl NewEvent {
    /// Trim text fields and check the event can be stored
    pub fn validated(&self) -> AppResult<NewEvent> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(invalid_input("Please enter a title for the event"));
        }
        if self.end < self.start {
            return Err(invalid_input("Event end must not be before its start"));
        }
        Ok(NewEvent {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            start: self.start,
            end: self.end,
            all_day: self.all_day,
        })
    }
}

impl From<EventDraft> for NewEvent {
    fn from(draft: EventDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            start: draft.start,
            end: draft.end,
            all_day: draft.all_day,
        }
    }
}

/// Row written to storage for a new or updated event
#[derive(Debug, Clone, Serialize)]
pub struct EventRow<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
}

impl<'a> EventRow<'a> {
    pub fn new(owner: &'a str, event: &'a NewEvent) -> Self {
        Self {
            user_id: owner,
            title: &event.title,
            description: &event.description,
            start_time: event.start,
            end_time: event.end,
            all_day: event.all_day,
        }
    }
}

/// Event as returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "iso_millis")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

impl From<CalendarEvent> for EventView {
    fn from(event: CalendarEvent) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description.unwrap_or_default(),
            start: event.start_time,
            end: event.end_time,
            all_day: event.all_day,
        }
    }
}

/// Dashboard statistics for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// Events starting today
    pub today: usize,
    /// Events starting this week (Sunday to Saturday)
    pub this_week: usize,
    /// All events
    pub total: usize,
    /// Next few events starting from now
    pub upcoming: Vec<EventView>,
}
