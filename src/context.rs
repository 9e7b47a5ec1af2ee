//! Request-scoped context.
//!
//! The request middleware resolves one `RequestContext` per request and runs
//! the rest of the stack inside a task-local scope, so response rendering
//! (error envelopes, the panic fallback page) sees the same locale the
//! handlers saw without threading it through every signature.

use crate::i18n::Locale;

/// Which surface a request belongs to; decides the error body format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// JSON API under `/api`
    Api,
    /// Server-rendered site shell
    #[default]
    Site,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestContext {
    pub locale: Locale,
    pub surface: Surface,
    /// Expose error details in responses (non-production only)
    pub debug: bool,
}

tokio::task_local! {
    pub static REQUEST_CONTEXT: RequestContext;
}

/// Context of the current request, or the defaults outside of one.
pub fn current() -> RequestContext {
    REQUEST_CONTEXT.try_with(|ctx| *ctx).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_outside_scope_is_default() {
        let ctx = current();
        assert_eq!(ctx.locale, Locale::Ru);
        assert_eq!(ctx.surface, Surface::Site);
        assert!(!ctx.debug);
    }

    #[tokio::test]
    async fn test_current_inside_scope() {
        let scoped = RequestContext {
            locale: Locale::En,
            surface: Surface::Api,
            debug: true,
        };
        let seen = REQUEST_CONTEXT.scope(scoped, async { current() }).await;
        assert_eq!(seen, scoped);
    }
}
