use crate::i18n::Locale;

/// All localized user-facing strings for a locale
///
/// Covers API error envelopes and the fixed text of the server-rendered shell.
/// Content text lives in the records themselves as `Localized` values.
#[derive(Debug, Clone)]
pub struct LocaleStrings {
    // ==================== API Messages ====================
    /// Message for 404 responses on unknown ids or resources
    pub not_found: &'static str,

    /// Message for requests without credentials on protected endpoints
    pub unauthorized: &'static str,

    /// Message for requests with invalid credentials
    pub forbidden: &'static str,

    /// Message for 422 responses; field details go into `errors`
    pub validation_failed: &'static str,

    /// Message for malformed request bodies
    pub bad_request: &'static str,

    /// Generic message for unexpected server failures
    pub server_error: &'static str,

    // ==================== Field Validation ====================
    /// Error attached to a required field that is missing
    pub field_required: &'static str,

    /// Error attached to a field with the wrong JSON type
    pub field_invalid: &'static str,

    // ==================== Shell ====================
    /// Site name appended to page titles
    pub site_name: &'static str,

    /// Placeholder shown until the client application has loaded
    pub loading: &'static str,

    /// Notice for visitors without JavaScript
    pub noscript: &'static str,

    /// Heading of the fallback page rendered when the shell itself fails
    pub error_title: &'static str,

    /// Body of the fallback page
    pub error_body: &'static str,

    /// Link back to the home page on the fallback page
    pub back_home: &'static str,
}

impl LocaleStrings {
    pub fn for_locale(locale: Locale) -> &'static LocaleStrings {
        match locale {
            Locale::Ru => &RUSSIAN,
            Locale::En => &ENGLISH,
        }
    }
}

static RUSSIAN: LocaleStrings = LocaleStrings {
    not_found: "Запрашиваемый ресурс не найден",
    unauthorized: "Требуется авторизация",
    forbidden: "Доступ запрещён",
    validation_failed: "Переданные данные некорректны",
    bad_request: "Некорректный запрос",
    server_error: "Внутренняя ошибка сервера",
    field_required: "Поле обязательно для заполнения",
    field_invalid: "Недопустимое значение поля",
    site_name: "Общественный форум",
    loading: "Загрузка…",
    noscript: "Для работы сайта необходимо включить JavaScript.",
    error_title: "Что-то пошло не так",
    error_body: "Не удалось отобразить страницу. Попробуйте обновить её позже.",
    back_home: "На главную",
};

static ENGLISH: LocaleStrings = LocaleStrings {
    not_found: "The requested resource was not found",
    unauthorized: "Authentication required",
    forbidden: "Access denied",
    validation_failed: "The given data was invalid",
    bad_request: "Malformed request",
    server_error: "Internal server error",
    field_required: "This field is required",
    field_invalid: "This field has an invalid value",
    site_name: "Public Affairs Summit",
    loading: "Loading…",
    noscript: "Please enable JavaScript to use this site.",
    error_title: "Something went wrong",
    error_body: "The page could not be displayed. Please try again later.",
    back_home: "Back to home",
};
