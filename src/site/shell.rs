//! HTML shell of the single-page application.
//!
//! The shell carries the head tags crawlers need, the localized navigation
//! and a loading placeholder inside `#root`; the client bundle takes over
//! from there.

use super::navigation::localize_href;
use super::resolver::LocaleContext;
use super::routes::{RouteDef, NAV_LINKS};
use super::seo::{SeoMeta, SeoUrls};
use crate::i18n::{Locale, LocaleStrings};

/// Everything needed to render one shell page.
pub struct ShellPage<'a> {
    pub ctx: &'a LocaleContext,
    pub route: &'a RouteDef,
    pub seo: &'a SeoMeta,
    pub urls: &'a SeoUrls,
    pub asset_url: &'a str,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn meta_tags(seo: &SeoMeta, urls: &SeoUrls, locale: Locale) -> String {
    let mut head = String::new();
    head.push_str(&format!("<title>{}</title>\n", escape_html(&seo.title)));
    head.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        escape_html(&seo.description)
    ));
    if let Some(keywords) = &seo.keywords {
        head.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            escape_html(keywords)
        ));
    }

    let canonical = escape_html(&urls.canonical);
    let alternate = escape_html(&urls.alternate);
    head.push_str(&format!("<link rel=\"canonical\" href=\"{canonical}\">\n"));
    head.push_str(&format!(
        "<link rel=\"alternate\" hreflang=\"{}\" href=\"{canonical}\">\n",
        locale.code()
    ));
    head.push_str(&format!(
        "<link rel=\"alternate\" hreflang=\"{}\" href=\"{alternate}\">\n",
        urls.alternate_locale.code()
    ));
    head.push_str(&format!(
        "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{canonical}\">\n"
    ));

    head.push_str(&format!("<meta property=\"og:type\" content=\"{}\">\n", seo.og_type));
    head.push_str(&format!(
        "<meta property=\"og:title\" content=\"{}\">\n",
        escape_html(&seo.title)
    ));
    head.push_str(&format!(
        "<meta property=\"og:description\" content=\"{}\">\n",
        escape_html(&seo.description)
    ));
    head.push_str(&format!("<meta property=\"og:url\" content=\"{canonical}\">\n"));
    head.push_str(&format!(
        "<meta property=\"og:locale\" content=\"{}\">\n",
        locale.og_locale()
    ));
    head.push_str(&format!(
        "<meta property=\"og:locale:alternate\" content=\"{}\">\n",
        urls.alternate_locale.og_locale()
    ));
    if let Some(image) = &seo.image {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            escape_html(image)
        ));
    }
    head
}

fn navigation(ctx: &LocaleContext) -> String {
    let mut nav = String::from("<nav class=\"site-nav\">\n");
    for (href, label) in NAV_LINKS {
        nav.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            escape_html(&ctx.href(href)),
            escape_html(label.get(ctx.locale()))
        ));
    }

    // Language switcher
    for locale in Locale::ALL {
        if locale == ctx.locale() {
            continue;
        }
        let target = ctx.path().split(['?', '#']).next().unwrap_or("/");
        nav.push_str(&format!(
            "<a href=\"/locale/{code}?redirect={target}\" hreflang=\"{code}\" lang=\"{code}\">{name}</a>\n",
            code = locale.code(),
            target = escape_html(&encode_query_value(target)),
            name = escape_html(locale.native_name()),
        ));
    }
    nav.push_str("</nav>\n");
    nav
}

/// Percent-encode a query value, keeping unreserved characters and `/`.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

pub fn render_shell(page: &ShellPage) -> String {
    let locale = page.ctx.locale();
    let strings = page.ctx.strings();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{lang}\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {meta}\
         </head>\n\
         <body>\n\
         {nav}\
         <div id=\"root\" data-locale=\"{code}\" data-route=\"{route}\">\n\
         <div class=\"app-loading\" role=\"status\">{loading}</div>\n\
         </div>\n\
         <noscript>{noscript}</noscript>\n\
         <script type=\"module\" src=\"{asset}\"></script>\n\
         </body>\n\
         </html>\n",
        lang = locale.html_lang(),
        meta = meta_tags(page.seo, page.urls, locale),
        nav = navigation(page.ctx),
        code = locale.code(),
        route = page.route.name,
        loading = escape_html(strings.loading),
        noscript = escape_html(strings.noscript),
        asset = escape_html(page.asset_url),
    )
}

/// Fallback page shown when rendering a page fails.
pub fn render_error_page(locale: Locale) -> String {
    let strings = LocaleStrings::for_locale(locale);

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{lang}\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"robots\" content=\"noindex\">\n\
         <title>{title} | {site}</title>\n\
         </head>\n\
         <body>\n\
         <main class=\"error-page\">\n\
         <h1>{title}</h1>\n\
         <p>{body}</p>\n\
         <a href=\"{home}\">{back}</a>\n\
         </main>\n\
         </body>\n\
         </html>\n",
        lang = locale.html_lang(),
        title = escape_html(strings.error_title),
        site = escape_html(strings.site_name),
        body = escape_html(strings.error_body),
        home = localize_href("/", locale),
        back = escape_html(strings.back_home),
    )
}
