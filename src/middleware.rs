use std::any::Any;

use anyhow::anyhow;
use axum::{
    extract::{Query, Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::context::{self, RequestContext, Surface, REQUEST_CONTEXT};
use crate::error::ApiError;
use crate::i18n::Locale;
use crate::site::{render_error_page, CookiePreference, LocaleContext, PreferenceStore};
use crate::state::AppState;

/// Header clients may use to pick the API locale explicitly
pub const LOCALE_HEADER: &str = "x-locale";

fn surface_of(path: &str) -> Surface {
    if path == "/api" || path.starts_with("/api/") {
        Surface::Api
    } else {
        Surface::Site
    }
}

/// API locale: `?lang=`, then `X-Locale`, then `Accept-Language`, then the default.
pub fn api_locale(request: &Request) -> Locale {
    let from_query = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(pairs)| {
            pairs
                .into_iter()
                .find(|(key, _)| key == "lang")
                .and_then(|(_, value)| Locale::from_code(&value))
        });

    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value: &HeaderValue| value.to_str().ok())
    };

    from_query
        .or_else(|| header(LOCALE_HEADER).and_then(Locale::from_code))
        .or_else(|| header(ACCEPT_LANGUAGE.as_str()).and_then(Locale::from_accept_language))
        .unwrap_or_default()
}

/// Site locale: URL prefix, then the `locale` cookie, then the default.
pub fn site_locale(request: &Request) -> Locale {
    let persisted = CookiePreference::from_headers(request.headers()).load();
    LocaleContext::resolve(request.uri().path(), persisted).locale()
}

/// Resolve the request locale once and run the rest of the stack inside
/// its context.
///
/// The locale is also available to handlers as `Extension<Locale>` and is
/// echoed in `Content-Language`.
pub async fn request_context(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let surface = surface_of(request.uri().path());
    let locale = match surface {
        Surface::Api => api_locale(&request),
        Surface::Site => site_locale(&request),
    };
    let ctx = RequestContext {
        locale,
        surface,
        debug: state.config.debug && !state.config.is_production(),
    };

    request.extensions_mut().insert(locale);
    let mut response = REQUEST_CONTEXT.scope(ctx, next.run(request)).await;
    response
        .headers_mut()
        .insert(CONTENT_LANGUAGE, HeaderValue::from_static(locale.code()));
    response
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Response for a handler that panicked.
///
/// API requests get the JSON error envelope; site requests get the
/// localized fallback page.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(panic.as_ref());
    let ctx = context::current();

    match ctx.surface {
        Surface::Api => ApiError::Unexpected(anyhow!("Handler panicked: {}", message)).into_response(),
        Surface::Site => {
            error!("Page rendering panicked: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(ctx.locale)),
            )
                .into_response()
        }
    }
}
