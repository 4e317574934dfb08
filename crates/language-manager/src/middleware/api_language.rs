//! Header-based language activation for API requests.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::negotiation::{RequestLanguageSignals, ResolvedLanguage};
use crate::runtime::with_language;
use crate::state::AppState;

/// Middleware to activate a language for API requests from headers alone.
///
/// Applies only under the configured API prefix. Checks `X-Language`, then the
/// first `Accept-Language` entry. Nothing is persisted. When no header names a
/// supported language the default stays in effect and nothing is activated.
pub async fn api_language(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !state.is_api_path(request.uri().path()) {
        return next.run(request).await;
    }

    let signals = RequestLanguageSignals::from_headers(request.headers(), &state.cookie().name);

    match state.resolver().resolve_headers(&signals) {
        Some(language) => {
            tracing::debug!(
                path = %request.uri().path(),
                language = %language,
                "activated API language from headers"
            );
            request
                .extensions_mut()
                .insert(ResolvedLanguage(language.clone()));
            with_language(language, next.run(request)).await
        }
        None => {
            request
                .extensions_mut()
                .insert(ResolvedLanguage(state.default_language().to_string()));
            next.run(request).await
        }
    }
}
