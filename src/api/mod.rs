//! REST content API, nested under `/api`.
//!
//! One set of handlers serves every resource: the `{resource}` segment picks
//! a `ResourceKind`, whose descriptor drives querying and validation and
//! whose transform renders the public shape.

mod auth;
mod handlers;

pub use auth::RequireApiKey;
pub use handlers::DataEnvelope;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:resource", get(handlers::index).post(handlers::store))
        .route(
            "/:resource/:id",
            get(handlers::show)
                .put(handlers::update)
                .patch(handlers::update)
                .delete(handlers::destroy),
        )
        .fallback(handlers::not_found)
}
