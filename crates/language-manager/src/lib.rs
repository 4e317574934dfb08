//! Multilingual routing for axum services.
//!
//! Resolves the request language from headers, cookie, session, and URL
//! prefix; translates paths between language-prefixed routes; persists the
//! user's choice; and compiles `.po` catalogs offline.

pub mod compile;
pub mod config;
pub mod context;
pub mod cookie;
pub mod csrf;
pub mod error;
pub mod languages;
pub mod middleware;
pub mod negotiation;
pub mod routes;
pub mod runtime;
pub mod session;
pub mod state;
pub mod translate;

use axum::Router;

pub use config::Config;
pub use negotiation::{LanguageResolver, RequestLanguageSignals, ResolvedLanguage};
pub use state::AppState;
pub use translate::{PathTranslator, RouteTable};

/// Build the application router with both language middlewares installed.
///
/// The caller must add a session layer on top; the page middleware and the
/// switch action read the session.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::language::router())
        .merge(routes::front::router())
        // Middleware layers (last added = first executed in request flow):
        // api_language → page_language → routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::page_language,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::api_language,
        ))
        .with_state(state)
}
