//! Internationalization (i18n) for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported locales and their metadata
//! - `locale`: The `Locale` enum (ru, en) and lenient parsing helpers
//! - `localized`: Per-locale content values and the `Translatable` trait behind `t()`
//! - `strings`: Fixed UI and API message strings
//!
//! # Example
//!
//! ```rust,ignore
//! use summit_site::i18n::{Locale, Localized, Translatable};
//!
//! let title = Localized::new().with(Locale::En, "Summit");
//! assert_eq!(title.translate(Locale::Ru), "Summit");
//! ```

mod locale;
mod localized;
mod registry;
mod strings;

pub use locale::Locale;
pub use localized::{decode_localized_list, Localized, LocalizedError, Translatable};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::LocaleStrings;
