//! Locale-prefixed path helpers.
//!
//! Paths may carry a query string and fragment; these are kept verbatim
//! through every rewrite.

use crate::i18n::Locale;

/// Split `"/news?page=2#top"` into `("/news", "?page=2#top")`.
fn split_suffix(path: &str) -> (&str, &str) {
    match path.find(['?', '#']) {
        Some(index) => path.split_at(index),
        None => (path, ""),
    }
}

/// Locale named by the first path segment, if it is exactly a supported code.
pub fn locale_segment(path: &str) -> Option<Locale> {
    let (path, _) = split_suffix(path);
    let segment = path.strip_prefix('/')?.split('/').next()?;
    Locale::ALL.into_iter().find(|locale| locale.code() == segment)
}

/// Remove a leading `/{locale}` segment: `/en` → `/`, `/en/news` → `/news`.
pub fn strip_locale_prefix(path: &str) -> String {
    let (bare, suffix) = split_suffix(path);
    match locale_segment(bare) {
        Some(locale) => {
            let rest = &bare[1 + locale.code().len()..];
            let rest = if rest.is_empty() { "/" } else { rest };
            format!("{rest}{suffix}")
        }
        None => path.to_string(),
    }
}

/// Prefix an unprefixed path with `/{locale}`; the root becomes `/{locale}`.
pub fn with_locale_prefix(path: &str, locale: Locale) -> String {
    let (bare, suffix) = split_suffix(path);
    let code = locale.code();
    match bare {
        "" | "/" => format!("/{code}{suffix}"),
        _ if bare.starts_with('/') => format!("/{code}{bare}{suffix}"),
        _ => format!("/{code}/{bare}{suffix}"),
    }
}

/// Path for the same page in another locale.
pub fn switch_locale_path(path: &str, locale: Locale) -> String {
    with_locale_prefix(&strip_locale_prefix(path), locale)
}

/// Whether `href` points at an application page served by the shell.
fn is_internal(href: &str) -> bool {
    if !href.starts_with('/') || href.starts_with("//") {
        return false;
    }
    let (bare, _) = split_suffix(href);
    !(bare == "/api" || bare.starts_with("/api/") || bare.starts_with("/assets/"))
}

/// Rewrite an application-internal link to carry the locale prefix.
///
/// External and protocol-relative URLs, `mailto:`/`tel:` links, bare
/// fragments and API or asset paths are returned unchanged.
pub fn localize_href(href: &str, locale: Locale) -> String {
    if is_internal(href) {
        switch_locale_path(href, locale)
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Prefix Detection ====================

    #[test]
    fn test_locale_segment() {
        assert_eq!(locale_segment("/en"), Some(Locale::En));
        assert_eq!(locale_segment("/ru/news/4"), Some(Locale::Ru));
        assert_eq!(locale_segment("/en?page=2"), Some(Locale::En));
        assert_eq!(locale_segment("/"), None);
        assert_eq!(locale_segment("/english"), None);
        assert_eq!(locale_segment("/fr/x"), None);
        assert_eq!(locale_segment("/EN"), None);
        assert_eq!(locale_segment("en"), None);
    }

    // ==================== Stripping ====================

    #[test]
    fn test_strip_locale_prefix() {
        assert_eq!(strip_locale_prefix("/en"), "/");
        assert_eq!(strip_locale_prefix("/en/"), "/");
        assert_eq!(strip_locale_prefix("/en/news"), "/news");
        assert_eq!(strip_locale_prefix("/ru/events/3?tab=faq#q1"), "/events/3?tab=faq#q1");
        assert_eq!(strip_locale_prefix("/english"), "/english");
        assert_eq!(strip_locale_prefix("/fr/x"), "/fr/x");
        assert_eq!(strip_locale_prefix("/"), "/");
    }

    // ==================== Switching ====================

    #[test]
    fn test_switch_locale_path() {
        assert_eq!(switch_locale_path("/", Locale::En), "/en");
        assert_eq!(switch_locale_path("/news", Locale::En), "/en/news");
        assert_eq!(switch_locale_path("/ru/news", Locale::En), "/en/news");
        assert_eq!(switch_locale_path("/en", Locale::Ru), "/ru");
        assert_eq!(switch_locale_path("/en/news?page=2#top", Locale::Ru), "/ru/news?page=2#top");
        assert_eq!(switch_locale_path("/?q=1", Locale::En), "/en?q=1");
    }

    #[test]
    fn test_switch_to_current_locale_keeps_path() {
        assert_eq!(switch_locale_path("/en/partners", Locale::En), "/en/partners");
    }

    // ==================== Href Rewriting ====================

    #[test]
    fn test_localize_internal_href() {
        assert_eq!(localize_href("/news", Locale::En), "/en/news");
        assert_eq!(localize_href("/", Locale::Ru), "/ru");
        assert_eq!(localize_href("/ru/news", Locale::En), "/en/news");
    }

    #[test]
    fn test_localize_href_leaves_other_targets() {
        for href in [
            "https://example.com/news",
            "//cdn.example.com/app.js",
            "mailto:info@summit.example",
            "tel:+78120000000",
            "#contacts",
            "/api/news",
            "/api",
            "/assets/app.js",
            "news",
        ] {
            assert_eq!(localize_href(href, Locale::En), href);
        }
    }

    proptest! {
        #[test]
        fn prop_switch_is_idempotent(segments in proptest::collection::vec("[a-z0-9]{1,8}", 0..4)) {
            let path = format!("/{}", segments.join("/"));
            for locale in Locale::ALL {
                let once = switch_locale_path(&path, locale);
                prop_assert_eq!(switch_locale_path(&once, locale), once.clone());
                prop_assert_eq!(locale_segment(&once), Some(locale));
            }
        }
    }
}
