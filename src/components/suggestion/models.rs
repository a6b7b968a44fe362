use crate::utils::time::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unpersisted, normalized event proposal produced from a model reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    #[serde(with = "iso_millis")]
    pub start: DateTime<Utc>,
    /// Always strictly after `start`
    #[serde(with = "iso_millis")]
    pub end: DateTime<Utc>,
    pub all_day: bool,
}

/// Fields the interpreter had to fill in or correct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Repairs {
    pub title_defaulted: bool,
    pub start_defaulted: bool,
    pub end_defaulted: bool,
}

impl Repairs {
    /// Whether any field was repaired
    pub fn any(&self) -> bool {
        self.title_defaulted || self.start_defaulted || self.end_defaulted
    }
}

/// Interpreter output: the draft plus a record of what was repaired
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub draft: EventDraft,
    pub repairs: Repairs,
}
