//! Localized field values and the `t()` translation accessor.
//!
//! Content text (titles, descriptions, ...) is stored as a JSON object keyed by
//! locale code. `Localized` is the in-memory form: always a mapping, never an
//! ambiguous string-or-object. Decoding happens once at the store boundary and
//! encoding always produces the object form.

use crate::i18n::Locale;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Lookup order after the requested locale.
const FALLBACK_CHAIN: [Locale; 2] = [Locale::En, Locale::Ru];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocalizedError {
    #[error("value for locale '{0}' must be a string")]
    NotAString(&'static str),

    #[error("expected a string or an object keyed by locale")]
    InvalidShape,
}

/// A text field with one value per locale.
///
/// Empty strings are never stored, so "present" always means "has text".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Localized(BTreeMap<Locale, String>);

impl Localized {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; empty text is ignored.
    pub fn with(mut self, locale: Locale, text: impl Into<String>) -> Self {
        self.set(locale, text);
        self
    }

    pub fn set(&mut self, locale: Locale, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.0.remove(&locale);
        } else {
            self.0.insert(locale, text);
        }
    }

    /// Exact value for a locale, without fallback.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0.get(&locale).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for `locale`, falling back to `en`, then `ru`, then `""`.
    pub fn resolve(&self, locale: Locale) -> &str {
        std::iter::once(locale)
            .chain(FALLBACK_CHAIN)
            .find_map(|l| self.get(l))
            .unwrap_or("")
    }

    /// Strict decode used when validating write payloads.
    ///
    /// Accepts `null` (empty), a plain string (stored under the default
    /// locale) or an object whose locale keys hold strings or `null`. Keys
    /// outside the supported set are dropped.
    pub fn decode(value: &Value) -> Result<Self, LocalizedError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::String(text) => Ok(Self::new().with(Locale::default(), text.as_str())),
            Value::Object(map) => {
                let mut localized = Self::new();
                for locale in Locale::ALL {
                    match map.get(locale.code()) {
                        None | Some(Value::Null) => {}
                        Some(Value::String(text)) => localized.set(locale, text.as_str()),
                        Some(_) => return Err(LocalizedError::NotAString(locale.code())),
                    }
                }
                Ok(localized)
            }
            _ => Err(LocalizedError::InvalidShape),
        }
    }

    /// Total decode used when reading stored rows: anything malformed is
    /// dropped instead of failing the read.
    pub fn decode_lenient(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let mut localized = Self::new();
                for locale in Locale::ALL {
                    if let Some(Value::String(text)) = map.get(locale.code()) {
                        localized.set(locale, text.as_str());
                    }
                }
                localized
            }
            other => Self::decode(other).unwrap_or_default(),
        }
    }

    /// Storage/wire form: an object with every supported locale key.
    ///
    /// Missing locales encode as `null` so the public JSON shape is stable.
    pub fn encode(&self) -> Value {
        let map: Map<String, Value> = Locale::ALL
            .iter()
            .map(|locale| {
                let value = self
                    .get(*locale)
                    .map(|text| Value::String(text.to_string()))
                    .unwrap_or(Value::Null);
                (locale.code().to_string(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Localized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Localized {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Localized::decode_lenient(&value))
    }
}

/// Anything that `t()` can turn into display text for a locale.
pub trait Translatable {
    fn translate(&self, locale: Locale) -> String;
}

impl Translatable for str {
    fn translate(&self, _locale: Locale) -> String {
        self.to_string()
    }
}

impl Translatable for String {
    fn translate(&self, _locale: Locale) -> String {
        self.clone()
    }
}

impl Translatable for Localized {
    fn translate(&self, locale: Locale) -> String {
        self.resolve(locale).to_string()
    }
}

impl Translatable for Value {
    fn translate(&self, locale: Locale) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            Value::Object(_) => Localized::decode_lenient(self).translate(locale),
            other => other.to_string(),
        }
    }
}

impl<T: Translatable> Translatable for Option<T> {
    fn translate(&self, locale: Locale) -> String {
        self.as_ref().map(|v| v.translate(locale)).unwrap_or_default()
    }
}

impl<T: Translatable + ?Sized> Translatable for &T {
    fn translate(&self, locale: Locale) -> String {
        (**self).translate(locale)
    }
}

/// Decode a field that must hold a JSON list of localized values.
pub fn decode_localized_list(value: &Value) -> Vec<Localized> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(Localized::decode_lenient)
            .filter(|l| !l.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // ==================== resolve Tests ====================

    #[test]
    fn test_resolve_requested_locale() {
        let title = Localized::new().with(Locale::Ru, "Саммит").with(Locale::En, "Summit");
        assert_eq!(title.resolve(Locale::Ru), "Саммит");
        assert_eq!(title.resolve(Locale::En), "Summit");
    }

    #[test]
    fn test_resolve_falls_back_to_english_then_russian() {
        let en_only = Localized::new().with(Locale::En, "Summit");
        assert_eq!(en_only.resolve(Locale::Ru), "Summit");

        let ru_only = Localized::new().with(Locale::Ru, "Саммит");
        assert_eq!(ru_only.resolve(Locale::En), "Саммит");
    }

    #[test]
    fn test_resolve_empty_mapping() {
        assert_eq!(Localized::new().resolve(Locale::En), "");
    }

    #[test]
    fn test_empty_text_is_absent() {
        let title = Localized::new().with(Locale::En, "").with(Locale::Ru, "Саммит");
        assert_eq!(title.get(Locale::En), None);
        assert_eq!(title.resolve(Locale::En), "Саммит");
    }

    // ==================== decode/encode Tests ====================

    #[test]
    fn test_decode_object() {
        let localized = Localized::decode(&json!({"ru": "Новости", "en": "News", "de": "x"})).unwrap();
        assert_eq!(localized.get(Locale::Ru), Some("Новости"));
        assert_eq!(localized.get(Locale::En), Some("News"));
    }

    #[test]
    fn test_decode_plain_string_goes_to_default_locale() {
        let localized = Localized::decode(&json!("Новости")).unwrap();
        assert_eq!(localized.get(Locale::Ru), Some("Новости"));
        assert_eq!(localized.get(Locale::En), None);
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert_eq!(
            Localized::decode(&json!({"ru": 5})),
            Err(LocalizedError::NotAString("ru"))
        );
        assert_eq!(Localized::decode(&json!([1, 2])), Err(LocalizedError::InvalidShape));
    }

    #[test]
    fn test_decode_lenient_drops_bad_values() {
        let localized = Localized::decode_lenient(&json!({"ru": 5, "en": "News"}));
        assert_eq!(localized.get(Locale::Ru), None);
        assert_eq!(localized.get(Locale::En), Some("News"));
        assert!(Localized::decode_lenient(&json!(42)).is_empty());
    }

    #[test]
    fn test_encode_has_every_key() {
        let encoded = Localized::new().with(Locale::En, "News").encode();
        assert_eq!(encoded, json!({"ru": null, "en": "News"}));
    }

    #[test]
    fn test_serde_uses_object_form() {
        let localized: Localized = serde_json::from_value(json!({"ru": "А", "en": "A"})).unwrap();
        assert_eq!(serde_json::to_value(&localized).unwrap(), json!({"ru": "А", "en": "A"}));
    }

    #[test]
    fn test_decode_localized_list() {
        let list = decode_localized_list(&json!([{"ru": "Один"}, {"en": ""}, "Два"]));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].get(Locale::Ru), Some("Два"));
        assert!(decode_localized_list(&json!("nope")).is_empty());
    }

    // ==================== Translatable Tests ====================

    #[test]
    fn test_translate_plain_string_unchanged() {
        assert_eq!("plain".translate(Locale::En), "plain");
        assert_eq!(json!("plain").translate(Locale::Ru), "plain");
    }

    #[test]
    fn test_translate_json_mapping() {
        let value = json!({"ru": "Партнёры", "en": "Partners"});
        assert_eq!(value.translate(Locale::En), "Partners");
        assert_eq!(Value::Null.translate(Locale::En), "");
    }

    proptest! {
        #[test]
        fn prop_translate_follows_fallback_chain(
            ru in proptest::option::of("[a-zа-я]{1,12}"),
            en in proptest::option::of("[a-z]{1,12}"),
            use_en in any::<bool>(),
        ) {
            let active = if use_en { Locale::En } else { Locale::Ru };
            let mut map = Map::new();
            if let Some(text) = &ru { map.insert("ru".into(), json!(text)); }
            if let Some(text) = &en { map.insert("en".into(), json!(text)); }

            let expected = match active {
                Locale::Ru => ru.clone().or(en.clone()),
                Locale::En => en.clone().or(ru.clone()),
            }
            .unwrap_or_default();

            prop_assert_eq!(Value::Object(map).translate(active), expected);
        }

        #[test]
        fn prop_plain_strings_pass_through(text in ".{0,24}", use_en in any::<bool>()) {
            let active = if use_en { Locale::En } else { Locale::Ru };
            prop_assert_eq!(text.as_str().translate(active), text.clone());
        }
    }
}
