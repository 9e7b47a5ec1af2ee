//! Locale type: the closed set of site languages.

use crate::i18n::{LocaleConfig, LocaleRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two supported site languages.
///
/// Parsing is lenient on purpose: callers resolving a locale from user input
/// get `None` for anything outside the set and move on to the next source,
/// they never fail the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ru,
    En,
}

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::En];

    /// Parse a two-letter code (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Option<Locale> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    /// Two-letter code used in URLs, cookies and JSON keys.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// The other supported locale, used for alternate-language links.
    pub fn other(&self) -> Locale {
        match self {
            Locale::Ru => Locale::En,
            Locale::En => Locale::Ru,
        }
    }

    /// Registry metadata for this locale.
    ///
    /// # Panics
    /// Panics if the registry lacks this code, which would be a registry
    /// definition bug.
    pub fn config(&self) -> &'static LocaleConfig {
        LocaleRegistry::get()
            .get_by_code(self.code())
            .expect("every Locale variant is registered")
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn html_lang(&self) -> &'static str {
        self.config().html_lang
    }

    pub fn og_locale(&self) -> &'static str {
        self.config().og_locale
    }

    /// Pick the first supported language from an `Accept-Language` header.
    ///
    /// Entries are considered in descending q-value order; region subtags
    /// (`en-GB`) match their primary language.
    pub fn from_accept_language(header: &str) -> Option<Locale> {
        let mut candidates: Vec<(f32, &str)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.trim().split(';');
                let tag = pieces.next()?.trim();
                let quality = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                (!tag.is_empty()).then_some((quality, tag))
            })
            .collect();

        // Stable sort keeps header order for equal weights
        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        candidates
            .into_iter()
            .filter(|(q, _)| *q > 0.0)
            .find_map(|(_, tag)| Locale::from_code(tag.split('-').next().unwrap_or(tag)))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::from_code(LocaleRegistry::get().default_locale().code).unwrap_or(Locale::Ru)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_known() {
        assert_eq!(Locale::from_code("ru"), Some(Locale::Ru));
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code(" EN "), Some(Locale::En));
    }

    #[test]
    fn test_from_code_unknown() {
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
        assert_eq!(Locale::from_code("english"), None);
    }

    #[test]
    fn test_default_is_ru() {
        assert_eq!(Locale::default(), Locale::Ru);
    }

    #[test]
    fn test_other() {
        assert_eq!(Locale::Ru.other(), Locale::En);
        assert_eq!(Locale::En.other(), Locale::Ru);
    }

    #[test]
    fn test_metadata() {
        assert_eq!(Locale::Ru.native_name(), "Русский");
        assert_eq!(Locale::En.html_lang(), "en");
        assert_eq!(Locale::En.og_locale(), "en_US");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let locale: Locale = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(locale, Locale::Ru);
    }

    // ==================== Accept-Language Tests ====================

    #[test]
    fn test_accept_language_simple() {
        assert_eq!(Locale::from_accept_language("en"), Some(Locale::En));
        assert_eq!(Locale::from_accept_language("ru-RU,ru;q=0.9"), Some(Locale::Ru));
    }

    #[test]
    fn test_accept_language_respects_quality() {
        assert_eq!(
            Locale::from_accept_language("ru;q=0.3, en-GB;q=0.8, de"),
            Some(Locale::En)
        );
    }

    #[test]
    fn test_accept_language_unsupported() {
        assert_eq!(Locale::from_accept_language("de-DE, fr;q=0.5"), None);
        assert_eq!(Locale::from_accept_language(""), None);
        assert_eq!(Locale::from_accept_language("en;q=0"), None);
    }
}
