use super::models::{CalendarEvent, EventSummary, EventView};
use crate::utils::time::{day_bounds, week_bounds};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Number of upcoming events shown on the dashboard
pub const UPCOMING_LIMIT: usize = 5;

/// Dashboard statistics for `events`, which must be sorted by start time
pub fn summarize(events: &[CalendarEvent], now: DateTime<Utc>, tz: Tz) -> EventSummary {
    let count_within = |bounds: Option<(DateTime<Utc>, DateTime<Utc>)>| match bounds {
        Some((from, to)) => events
            .iter()
            .filter(|event| event.start_time >= from && event.start_time < to)
            .count(),
        None => 0,
    };

    let upcoming = events
        .iter()
        .filter(|event| event.start_time >= now)
        .take(UPCOMING_LIMIT)
        .cloned()
        .map(EventView::from)
        .collect();

    EventSummary {
        today: count_within(day_bounds(&now, tz)),
        this_week: count_within(week_bounds(&now, tz)),
        total: events.len(),
        upcoming,
    }
}
