//! Validation of write payloads against a descriptor's field list.
//!
//! Accepted values are normalized to their storage form: localized fields
//! become `{ru, en}` objects, dates become ISO strings, flags become booleans.
//! Keys the descriptor does not declare are dropped.

use super::record::{parse_date, parse_time};
use crate::i18n::{LocaleStrings, Localized};
use crate::query::{FieldKind, FieldSpec, ResourceDescriptor};
use crate::store::Record;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeMap;

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    Create,
    Update,
}

#[derive(Debug, PartialEq)]
pub enum PayloadError {
    NotAnObject,
    Invalid(FieldErrors),
}

/// Validate and normalize a JSON body for `store` or `update`.
pub fn validate_payload(
    descriptor: &ResourceDescriptor,
    body: &Value,
    mode: PayloadMode,
    strings: &LocaleStrings,
) -> Result<Record, PayloadError> {
    let Value::Object(input) = body else {
        return Err(PayloadError::NotAnObject);
    };

    let mut record = Record::new();
    let mut errors = FieldErrors::new();

    for spec in descriptor.fields {
        let value = input.get(spec.name);

        let present = match value {
            None => {
                if spec.required && mode == PayloadMode::Create {
                    errors.insert(spec.name.to_string(), vec![strings.field_required.to_string()]);
                }
                continue;
            }
            Some(value) => value,
        };

        match normalize(spec, present) {
            Some(normalized) if spec.required && is_empty(&normalized) => {
                errors.insert(spec.name.to_string(), vec![strings.field_required.to_string()]);
            }
            Some(normalized) => {
                record.insert(spec.name.to_string(), normalized);
            }
            None => {
                errors.insert(spec.name.to_string(), vec![strings.field_invalid.to_string()]);
            }
        }
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(PayloadError::Invalid(errors))
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Object(map) => map.values().all(Value::is_null),
        _ => false,
    }
}

/// Storage form of a value, or `None` when it has the wrong shape.
fn normalize(spec: &FieldSpec, value: &Value) -> Option<Value> {
    if value.is_null() {
        return Some(match spec.kind {
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::TextList | FieldKind::LocalizedList => Value::Array(Vec::new()),
            _ => Value::Null,
        });
    }

    match spec.kind {
        FieldKind::Text => match value {
            Value::String(text) => Some(Value::String(text.trim().to_string())),
            Value::Number(number) => Some(Value::String(number.to_string())),
            _ => None,
        },
        FieldKind::Localized => Localized::decode(value).ok().map(|l| l.encode()),
        FieldKind::LocalizedList => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| Localized::decode(item).ok().map(|l| l.encode()))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            _ => None,
        },
        FieldKind::TextList => {
            let items = match value {
                Value::Array(items) => items.clone(),
                scalar => vec![scalar.clone()],
            };
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(text) => Some(Value::String(text.trim().to_string())),
                    Value::Number(number) => Some(Value::String(number.to_string())),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
        FieldKind::Integer => match value {
            Value::Number(number) => number.as_i64().map(Value::from),
            Value::String(text) => text.trim().parse::<i64>().ok().map(Value::from),
            _ => None,
        },
        FieldKind::Boolean => match value {
            Value::Bool(flag) => Some(Value::Bool(*flag)),
            Value::Number(number) => number.as_i64().map(|n| Value::Bool(n != 0)),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(Value::Bool(true)),
                "0" | "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        FieldKind::Date => {
            let text = value.as_str()?.trim();
            NaiveDate::parse_from_str(text, "%d.%m.%Y")
                .ok()
                .or_else(|| parse_date(text))
                .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
        }
        FieldKind::Time => {
            parse_time(value.as_str()?).map(|time| Value::String(time.format("%H:%M:%S").to_string()))
        }
        FieldKind::Timestamp => {
            let text = value.as_str()?.trim();
            NaiveDateTime::parse_from_str(text, "%d.%m.%Y %H:%M")
                .ok()
                .or_else(|| {
                    parse_date(text).zip(parse_time(text)).map(|(d, t)| d.and_time(t))
                })
                .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
                .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
        }
    }
}
