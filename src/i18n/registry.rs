//! Locale registry: Single source of truth for the supported site locales.
//!
//! Each locale carries the metadata needed outside of plain text selection:
//! display names for the language switcher and the tags written into HTML and
//! OpenGraph markup. The registry is initialized once with `OnceLock` and is
//! immutable thereafter.

use std::sync::OnceLock;

/// Metadata for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Two-letter code used in URLs and the persisted preference ("ru", "en")
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name of the language, shown in the switcher
    pub native_name: &'static str,

    /// Value for the `<html lang>` attribute
    pub html_lang: &'static str,

    /// Value for `og:locale`
    pub og_locale: &'static str,

    /// Whether this is the default locale (exactly one should be true)
    pub is_default: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global registry instance, initializing it on first call.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Look up a locale configuration by its two-letter code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All registered locales in switcher order.
    pub fn list(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }

    /// The default locale configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one default locale.
    pub fn default_locale(&self) -> &LocaleConfig {
        let defaults: Vec<_> = self.locales.iter().filter(|l| l.is_default).collect();

        match defaults.len() {
            0 => panic!("No default locale found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default locales found in registry"),
        }
    }
}

fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "ru",
            name: "Russian",
            native_name: "Русский",
            html_lang: "ru",
            og_locale: "ru_RU",
            is_default: true,
        },
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            html_lang: "en",
            og_locale: "en_US",
            is_default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code() {
        let registry = LocaleRegistry::get();

        let ru = registry.get_by_code("ru").expect("ru is registered");
        assert_eq!(ru.native_name, "Русский");
        assert_eq!(ru.og_locale, "ru_RU");
        assert!(ru.is_default);

        let en = registry.get_by_code("en").expect("en is registered");
        assert_eq!(en.og_locale, "en_US");
        assert!(!en.is_default);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LocaleRegistry::get().get_by_code("fr").is_none());
        assert!(LocaleRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_default_is_russian() {
        assert_eq!(LocaleRegistry::get().default_locale().code, "ru");
    }

    #[test]
    fn test_list_order() {
        let codes: Vec<_> = LocaleRegistry::get().list().iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["ru", "en"]);
    }
}
