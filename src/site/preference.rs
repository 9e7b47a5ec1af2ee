use crate::i18n::Locale;
use axum::http::{header::COOKIE, HeaderMap};

/// Single key the locale preference is stored under.
pub const PREFERENCE_KEY: &str = "locale";

/// Cookie lifetime in seconds (one year)
pub const PREFERENCE_MAX_AGE: u64 = 31_536_000;

/// Where the visitor's chosen locale is persisted between navigations.
pub trait PreferenceStore {
    fn load(&self) -> Option<Locale>;
    fn save(&mut self, locale: Locale);
}

/// In-process preference, for tests and non-HTTP callers.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreference {
    value: Option<Locale>,
}

impl MemoryPreference {
    pub fn new(value: Option<Locale>) -> Self {
        Self { value }
    }
}

impl PreferenceStore for MemoryPreference {
    fn load(&self) -> Option<Locale> {
        self.value
    }

    fn save(&mut self, locale: Locale) {
        self.value = Some(locale);
    }
}

/// Preference carried by the `locale` cookie.
///
/// `save` only records the new value; the handler emits it with
/// [`CookiePreference::set_cookie`].
#[derive(Debug, Default, Clone)]
pub struct CookiePreference {
    current: Option<Locale>,
    pending: Option<Locale>,
}

impl CookiePreference {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            current: cookie_value(headers, PREFERENCE_KEY).and_then(Locale::from_code),
            pending: None,
        }
    }

    /// `Set-Cookie` value for a preference saved during this request.
    pub fn set_cookie(&self) -> Option<String> {
        self.pending.map(preference_cookie)
    }
}

impl PreferenceStore for CookiePreference {
    fn load(&self) -> Option<Locale> {
        self.pending.or(self.current)
    }

    fn save(&mut self, locale: Locale) {
        self.pending = (self.current != Some(locale)).then_some(locale);
    }
}

/// Value of cookie `name` across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

pub fn preference_cookie(locale: Locale) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        PREFERENCE_KEY,
        locale.code(),
        PREFERENCE_MAX_AGE
    )
}
