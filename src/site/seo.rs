use super::navigation::{strip_locale_prefix, with_locale_prefix};
use crate::i18n::Locale;

/// Head metadata for one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub image: Option<String>,
    pub canonical_url: String,
    pub og_type: &'static str,
}

/// Canonical and alternate-language URLs of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoUrls {
    pub canonical: String,
    pub alternate: String,
    pub alternate_locale: Locale,
}

/// Canonical is the unprefixed path; the alternate points at the other locale.
///
/// Query strings and fragments are not part of either URL.
pub fn seo_urls(base_url: &str, path: &str, locale: Locale) -> SeoUrls {
    let bare = path.split(['?', '#']).next().unwrap_or("/");
    let stripped = strip_locale_prefix(bare);
    let other = locale.other();

    SeoUrls {
        canonical: format!("{base_url}{stripped}"),
        alternate: format!("{base_url}{}", with_locale_prefix(&stripped, other)),
        alternate_locale: other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://summit.example";

    #[test]
    fn test_prefixed_path() {
        let urls = seo_urls(BASE, "/en/news", Locale::En);
        assert_eq!(urls.canonical, "https://summit.example/news");
        assert_eq!(urls.alternate, "https://summit.example/ru/news");
        assert_eq!(urls.alternate_locale, Locale::Ru);
    }

    #[test]
    fn test_persisted_locale_without_prefix() {
        let urls = seo_urls(BASE, "/partners", Locale::En);
        assert_eq!(urls.canonical, "https://summit.example/partners");
        assert_eq!(urls.alternate, "https://summit.example/ru/partners");
    }

    #[test]
    fn test_root() {
        let urls = seo_urls(BASE, "/", Locale::Ru);
        assert_eq!(urls.canonical, "https://summit.example/");
        assert_eq!(urls.alternate, "https://summit.example/en");

        let urls = seo_urls(BASE, "/ru", Locale::Ru);
        assert_eq!(urls.canonical, "https://summit.example/");
        assert_eq!(urls.alternate, "https://summit.example/en");
    }

    #[test]
    fn test_query_is_dropped() {
        let urls = seo_urls(BASE, "/en/news?page=2", Locale::En);
        assert_eq!(urls.canonical, "https://summit.example/news");
    }
}
