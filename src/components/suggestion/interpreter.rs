use super::models::{EventDraft, Interpretation, Repairs};
use crate::error::ParseError;
use crate::utils::time::parse_iso_datetime;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};

/// Title used when the model does not provide one
pub const DEFAULT_TITLE: &str = "New Event";

/// Find the first balanced `{...}` substring in free text.
///
/// Braces inside JSON string literals do not count towards the balance, so a
/// title like `"Fix {build}"` does not cut the object short.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(end) = matching_brace(bytes, start) {
            return Some(&text[start..=end]);
        }
        from = start + 1;
    }
    None
}

/// Index of the brace closing the one at `start`, if the text ever closes it
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Turn a raw model reply into an event draft, repairing any field defects.
///
/// Only fails when no JSON object can be found or parsed.
pub fn interpret(raw: &str, now: DateTime<Utc>, tz: Tz) -> Result<Interpretation, ParseError> {
    let json = extract_json_object(raw).ok_or(ParseError::NoJsonObject)?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| ParseError::MalformedJson(e.to_string()))?;
    let fields = match value {
        Value::Object(fields) => fields,
        _ => return Err(ParseError::MalformedJson("expected a JSON object".to_string())),
    };

    let mut repairs = Repairs::default();

    let start = match timestamp_field(&fields, "start", tz) {
        Some(start) => start,
        None => {
            repairs.start_defaulted = true;
            now
        }
    };

    let end = match timestamp_field(&fields, "end", tz) {
        Some(end) if end > start => end,
        _ => {
            repairs.end_defaulted = true;
            start + Duration::hours(1)
        }
    };

    let title = match fields.get("title") {
        Some(Value::String(title)) if !title.is_empty() => title.clone(),
        _ => {
            repairs.title_defaulted = true;
            DEFAULT_TITLE.to_string()
        }
    };

    let description = match fields.get("description") {
        Some(Value::String(description)) => description.clone(),
        _ => String::new(),
    };

    let all_day = fields.get("allDay").map(is_truthy).unwrap_or(false);

    Ok(Interpretation {
        draft: EventDraft {
            title,
            description,
            start,
            end,
            all_day,
        },
        repairs,
    })
}

/// Like [`interpret`], discarding the repair record
pub fn interpret_response(raw: &str, now: DateTime<Utc>, tz: Tz) -> Result<EventDraft, ParseError> {
    interpret(raw, now, tz).map(|interpretation| interpretation.draft)
}

fn timestamp_field(fields: &Map<String, Value>, key: &str, tz: Tz) -> Option<DateTime<Utc>> {
    match fields.get(key) {
        Some(Value::String(raw)) => parse_iso_datetime(raw, tz),
        _ => None,
    }
}

/// JavaScript-style truthiness, so `"yes"` and `1` count as true
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0 && !n.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
