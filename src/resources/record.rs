//! Typed, total reads over stored rows.
//!
//! Every accessor substitutes a default instead of failing, so transforms
//! can never reject a row because an optional column is missing or malformed.

use crate::i18n::{decode_localized_list, Localized};
use crate::store::{record_id, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Stored date or timestamp → calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(text).map(|dt| dt.date()))
}

/// Stored time or timestamp → wall-clock time.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
        .or_else(|| parse_datetime(text).map(|dt| dt.time()))
}

/// Borrowed view over a row with typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    record: &'a Record,
}

impl<'a> RecordView<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    fn value(&self, key: &str) -> Option<&'a Value> {
        self.record.get(key).filter(|v| !v.is_null())
    }

    pub fn id(&self) -> i64 {
        record_id(self.record).unwrap_or_default()
    }

    pub fn localized(&self, key: &str) -> Localized {
        self.value(key)
            .map(Localized::decode_lenient)
            .unwrap_or_default()
    }

    pub fn localized_list(&self, key: &str) -> Vec<Localized> {
        self.value(key).map(decode_localized_list).unwrap_or_default()
    }

    /// Non-empty text; numbers are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.value(key)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    pub fn text_list(&self, key: &str) -> Vec<String> {
        match self.value(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) if !text.is_empty() => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.value(key)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.round() as i64)),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        match self.value(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(text)) => matches!(text.trim(), "1" | "true" | "t"),
            _ => false,
        }
    }

    /// `dd.mm.yyyy`, or `None` when absent or unparseable.
    pub fn date(&self, key: &str) -> Option<String> {
        let text = self.value(key)?.as_str()?;
        parse_date(text).map(|date| date.format(DATE_FORMAT).to_string())
    }

    /// `HH:mm`, or `None` when absent or unparseable.
    pub fn time(&self, key: &str) -> Option<String> {
        let text = self.value(key)?.as_str()?;
        parse_time(text).map(|time| time.format(TIME_FORMAT).to_string())
    }
}
