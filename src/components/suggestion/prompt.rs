use crate::utils::time::{format_reference_date, local_date};
use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use chrono::Datelike;
use chrono_tz::Tz;
use std::fmt;

/// Number of days listed in the prompt's date reference table
pub const REFERENCE_DAYS: usize = 14;

/// One row of the date reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateReference {
    pub weekday: Weekday,
    pub date: NaiveDate,
}

/// The next two weeks of calendar dates, starting today
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateReferenceTable {
    entries: Vec<DateReference>,
}

impl DateReferenceTable {
    /// Build the table for the `REFERENCE_DAYS` days starting at `today`
    pub fn starting(today: NaiveDate) -> Self {
        let entries = (0..REFERENCE_DAYS as i64)
            .filter_map(|offset| today.checked_add_signed(Duration::days(offset)))
            .map(|date| DateReference {
                weekday: date.weekday(),
                date,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[DateReference] {
        &self.entries
    }
}

impl fmt::Display for DateReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", format_reference_date(entry.date))?;
        }
        Ok(())
    }
}

/// Compose the instruction sent to the text generation model.
///
/// `now` is evaluated in `tz` to decide what "today" is.
pub fn build_prompt(user_prompt: &str, now: DateTime<Utc>, tz: Tz) -> String {
    let today = local_date(&now, tz);
    let local_now = now.with_timezone(&tz);
    let table = DateReferenceTable::starting(today);

    format!(
        "You are a calendar assistant. Create a calendar event from this request: \"{user_prompt}\"\n\
         \n\
         Important date reference (today is {today}, current time {time} {tz}):\n\
         - \"this [day]\" means the upcoming occurrence of that weekday, counting today\n\
         - \"next [day]\" means the occurrence of that weekday in the following week\n\
         - A weekday mentioned without a date means its next occurrence from today\n\
         \n\
         Next two weeks:\n\
         {table}\n\
         \n\
         Return ONLY a JSON object with these exact fields (no other text):\n\
         {{\n  \
           \"title\": \"brief event title\",\n  \
           \"description\": \"detailed description\",\n  \
           \"start\": \"ISO-8601 date string for start time\",\n  \
           \"end\": \"ISO-8601 date string for end time\",\n  \
           \"allDay\": boolean for all-day event\n\
         }}\n\
         \n\
         Example response:\n\
         {{\n  \
           \"title\": \"Team Meeting\",\n  \
           \"description\": \"Weekly team sync to discuss project progress\",\n  \
           \"start\": \"2024-02-14T14:00:00.000Z\",\n  \
           \"end\": \"2024-02-14T15:00:00.000Z\",\n  \
           \"allDay\": false\n\
         }}",
        user_prompt = user_prompt,
        today = format_reference_date(today),
        time = local_now.format("%H:%M"),
        tz = tz.name(),
        table = table,
    )
}
