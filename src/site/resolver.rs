//! Per-navigation locale resolution.

use super::navigation::{locale_segment, localize_href, switch_locale_path};
use super::preference::PreferenceStore;
use crate::i18n::{Locale, LocaleStrings, Translatable};

/// Where the active locale came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    /// `/{locale}/...` prefix in the URL
    Path,
    /// Previously saved preference
    Persisted,
    Default,
}

/// The active locale of one navigation.
///
/// Created once from the request path and the persisted preference, then
/// passed to everything that renders text. Changing the locale produces a
/// new navigation rather than mutating this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    locale: Locale,
    source: LocaleSource,
    path: String,
}

impl LocaleContext {
    /// URL prefix wins over the persisted value, which wins over the default.
    pub fn resolve(path: &str, persisted: Option<Locale>) -> Self {
        let (locale, source) = match (locale_segment(path), persisted) {
            (Some(locale), _) => (locale, LocaleSource::Path),
            (None, Some(locale)) => (locale, LocaleSource::Persisted),
            (None, None) => (Locale::default(), LocaleSource::Default),
        };

        Self {
            locale,
            source,
            path: path.to_string(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn source(&self) -> LocaleSource {
        self.source
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Text for the active locale; plain strings pass through unchanged.
    pub fn t<T: Translatable + ?Sized>(&self, value: &T) -> String {
        value.translate(self.locale)
    }

    pub fn strings(&self) -> &'static LocaleStrings {
        LocaleStrings::for_locale(self.locale)
    }

    pub fn href(&self, href: &str) -> String {
        localize_href(href, self.locale)
    }

    /// Persist `locale` and return the path to navigate to.
    pub fn switch_to(&self, locale: Locale, preference: &mut impl PreferenceStore) -> String {
        preference.save(locale);
        switch_locale_path(&self.path, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;
    use crate::site::preference::MemoryPreference;
    use serde_json::json;

    // ==================== Resolution Order ====================

    #[test]
    fn test_path_wins_over_persisted() {
        let ctx = LocaleContext::resolve("/en/news", Some(Locale::Ru));
        assert_eq!(ctx.locale(), Locale::En);
        assert_eq!(ctx.source(), LocaleSource::Path);
    }

    #[test]
    fn test_persisted_used_without_prefix() {
        let ctx = LocaleContext::resolve("/partners", Some(Locale::En));
        assert_eq!(ctx.locale(), Locale::En);
        assert_eq!(ctx.source(), LocaleSource::Persisted);
    }

    #[test]
    fn test_default_for_bare_root() {
        let ctx = LocaleContext::resolve("/", None);
        assert_eq!(ctx.locale(), Locale::Ru);
        assert_eq!(ctx.source(), LocaleSource::Default);
    }

    #[test]
    fn test_unknown_segment_is_ordinary_path() {
        let ctx = LocaleContext::resolve("/fr/x", None);
        assert_eq!(ctx.locale(), Locale::Ru);
        assert_eq!(ctx.source(), LocaleSource::Default);
    }

    // ==================== Translation ====================

    #[test]
    fn test_t_with_mapping_and_plain_string() {
        let ctx = LocaleContext::resolve("/en", None);
        let title = Localized::new().with(Locale::Ru, "Новости");
        assert_eq!(ctx.t(&title), "Новости");
        assert_eq!(ctx.t("Summit"), "Summit");
        assert_eq!(ctx.t(&json!({"ru": "Да", "en": "Yes"})), "Yes");
        assert_eq!(ctx.t(&json!(null)), "");
    }

    #[test]
    fn test_strings_follow_locale() {
        let ctx = LocaleContext::resolve("/en", None);
        assert_eq!(ctx.strings().loading, "Loading…");
        assert_eq!(ctx.href("/news"), "/en/news");
    }

    // ==================== Switching ====================

    #[test]
    fn test_switch_to_persists_and_rewrites() {
        let mut preference = MemoryPreference::default();
        let ctx = LocaleContext::resolve("/ru/news?page=2", None);

        let target = ctx.switch_to(Locale::En, &mut preference);
        assert_eq!(target, "/en/news?page=2");
        assert_eq!(preference.load(), Some(Locale::En));

        let next = LocaleContext::resolve(&target, preference.load());
        assert_eq!(next.locale(), Locale::En);
    }

    #[test]
    fn test_switch_to_root() {
        let mut preference = MemoryPreference::default();
        let ctx = LocaleContext::resolve("/", None);
        assert_eq!(ctx.switch_to(Locale::En, &mut preference), "/en");
    }
}
