//! Bilingual (RU/EN) summit content site.
//!
//! One axum service exposes the content REST API under `/api` and renders
//! the single-page application shell for every other path. Locale handling
//! (URL prefix, persisted preference, `Accept-Language` on the API) is
//! resolved once per request by [`middleware::request_context`].

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod query;
pub mod resources;
pub mod security;
pub mod site;
pub mod state;
pub mod store;

use std::time::Duration;

use axum::{
    http::{
        header::{ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .nest("/api", api::router())
        .route("/health", get(health))
        .route("/locale/:code", get(site::switch_locale))
        .fallback(site::page);

    with_middleware(routes, state)
}

/// Wrap routes in the shared middleware stack and attach state.
///
/// Panics are caught inside the request context so the fallback response
/// is rendered in the request's locale.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            ACCEPT_LANGUAGE,
            HeaderName::from_static(middleware::LOCALE_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60));

    routes
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_context,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
