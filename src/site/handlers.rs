use axum::{
    extract::{Path, Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode, Uri,
    },
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use super::navigation::strip_locale_prefix;
use super::preference::{CookiePreference, PreferenceStore};
use super::resolver::{LocaleContext, LocaleSource};
use super::routes::{match_route, RouteMatch};
use super::seo::{seo_urls, SeoMeta};
use super::shell::{render_shell, ShellPage};
use crate::i18n::Locale;
use crate::state::AppState;
use crate::store::Record;

/// Heading and image of the record behind a detail route.
struct DetailInfo {
    title: String,
    image: Option<String>,
}

async fn detail_info(state: &AppState, matched: &RouteMatch, ctx: &LocaleContext) -> Option<DetailInfo> {
    let kind = matched.route.resource?;
    let id = matched.id?;

    let record: Record = match state.store.find(kind.descriptor().table, id).await {
        Ok(found) => found?,
        Err(err) => {
            warn!("Failed to load {} #{} for page head: {:#}", kind.descriptor().name, id, err);
            return None;
        }
    };

    let title = record
        .get(kind.heading_field())
        .map(|value| ctx.t(value))
        .filter(|title| !title.is_empty())?;
    let image = record
        .get("image")
        .and_then(|value| value.as_str())
        .filter(|image| !image.is_empty())
        .map(str::to_string);

    Some(DetailInfo { title, image })
}

/// Render the application shell for any non-API path.
pub async fn page(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let mut preference = CookiePreference::from_headers(&headers);
    let ctx = LocaleContext::resolve(path, preference.load());

    // URL locale becomes the persisted preference
    if ctx.source() == LocaleSource::Path {
        preference.save(ctx.locale());
    }

    let matched = match_route(&strip_locale_prefix(uri.path()));
    let locale = ctx.locale();
    let detail = detail_info(&state, &matched, &ctx).await;

    let page_title = detail
        .as_ref()
        .map(|d| d.title.clone())
        .unwrap_or_else(|| matched.route.title.get(locale).to_string());
    let urls = seo_urls(&state.config.site_base_url, uri.path(), locale);
    let seo = SeoMeta {
        title: format!("{} | {}", page_title, ctx.strings().site_name),
        description: matched.route.description.get(locale).to_string(),
        keywords: None,
        image: detail.and_then(|d| d.image),
        canonical_url: urls.canonical.clone(),
        og_type: matched.route.og_type(),
    };

    let html = render_shell(&ShellPage {
        ctx: &ctx,
        route: matched.route,
        seo: &seo,
        urls: &urls,
        asset_url: &state.config.asset_url,
    });

    let status = if matched.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    debug!("Rendered shell route={} locale={} status={}", matched.route.name, locale, status);

    let mut response = (status, Html(html)).into_response();
    attach_preference(&mut response, &preference);
    response
}

#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    redirect: Option<String>,
}

/// Same-site absolute path that is safe to put into `Location`.
fn is_safe_redirect(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && target.chars().all(|c| c.is_ascii_graphic() && c != '\\')
}

/// `GET /locale/{code}?redirect=`: persist the locale and re-navigate.
///
/// Unknown codes leave the preference untouched and redirect to the target
/// as given.
pub async fn switch_locale(
    Path(code): Path<String>,
    Query(params): Query<SwitchParams>,
    headers: HeaderMap,
) -> Response {
    let target = params
        .redirect
        .as_deref()
        .filter(|target| is_safe_redirect(target))
        .unwrap_or("/");

    let mut preference = CookiePreference::from_headers(&headers);
    let location = match Locale::from_code(&code) {
        Some(locale) => {
            let ctx = LocaleContext::resolve(target, preference.load());
            ctx.switch_to(locale, &mut preference)
        }
        None => {
            debug!("Ignoring switch to unknown locale {:?}", code);
            target.to_string()
        }
    };

    let location = HeaderValue::from_str(&location).unwrap_or(HeaderValue::from_static("/"));
    let mut response = (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response();
    attach_preference(&mut response, &preference);
    response
}

fn attach_preference(response: &mut Response, preference: &CookiePreference) {
    if let Some(cookie) = preference.set_cookie() {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_redirect() {
        assert!(is_safe_redirect("/"));
        assert!(is_safe_redirect("/en/news?page=2#top"));
        assert!(!is_safe_redirect("//evil.example"));
        assert!(!is_safe_redirect("https://evil.example"));
        assert!(!is_safe_redirect("/\\evil.example"));
        assert!(!is_safe_redirect("/news\r\nSet-Cookie: x=1"));
        assert!(!is_safe_redirect(""));
    }
}
