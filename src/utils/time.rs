use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Offset-less date-time layouts accepted from model output
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Format a UTC timestamp as ISO-8601 with millisecond precision and a `Z` suffix
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a date the way the prompt reference table lists it, e.g. "Wednesday, February 14, 2024"
pub fn format_reference_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Parse an ISO-8601 timestamp.
///
/// Strings carrying an offset are taken as-is. Date-times without an offset and
/// bare dates are interpreted as local time in `tz`. Returns `None` for anything
/// that is not a real calendar instant.
pub fn parse_iso_datetime(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return resolve_local(&naive, tz);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| local_midnight(date, tz))
}

/// Resolve a wall-clock time in `tz`, picking the earlier instant on DST overlaps
/// and moving forward an hour when the time falls into a DST gap
pub fn resolve_local(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// The first instant of `date` in `tz`
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    resolve_local(&date.and_hms_opt(0, 0, 0)?, tz)
}

/// The calendar date of `now` in `tz`
pub fn local_date(now: &DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Half-open `[start, end)` bounds of the day containing `now` in `tz`
pub fn day_bounds(now: &DateTime<Utc>, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = local_date(now, tz);
    let start = local_midnight(today, tz)?;
    let end = local_midnight(today.succ_opt()?, tz)?;
    Some((start, end))
}

/// Half-open `[start, end)` bounds of the Sunday-to-Saturday week containing `now` in `tz`
pub fn week_bounds(now: &DateTime<Utc>, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = local_date(now, tz);
    let sunday = today.checked_sub_signed(Duration::days(
        today.weekday().num_days_from_sunday() as i64,
    ))?;
    let next_sunday = sunday.checked_add_signed(Duration::days(7))?;
    Some((local_midnight(sunday, tz)?, local_midnight(next_sunday, tz)?))
}

/// Serde adapter writing timestamps as `2024-02-14T14:00:00.000Z`
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
