//! Server-rendered side of the site: locale resolution, localized
//! navigation, SEO URLs and the SPA shell.

mod handlers;
pub mod navigation;
pub mod preference;
pub mod resolver;
pub mod routes;
pub mod seo;
pub mod shell;

pub use handlers::{page, switch_locale};
pub use navigation::{localize_href, locale_segment, strip_locale_prefix, switch_locale_path, with_locale_prefix};
pub use preference::{CookiePreference, MemoryPreference, PreferenceStore, PREFERENCE_KEY};
pub use resolver::{LocaleContext, LocaleSource};
pub use routes::{match_route, RouteDef, RouteMatch};
pub use seo::{seo_urls, SeoMeta, SeoUrls};
pub use shell::{escape_html, render_error_page, render_shell, ShellPage};
