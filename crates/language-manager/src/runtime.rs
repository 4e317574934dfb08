//! Scoped language activation.
//!
//! The active language lives in a task-local that only exists inside
//! [`with_language`]. Once the scoped future completes the value is gone, so
//! a worker task reused for a later request starts with nothing active.

use std::future::Future;

tokio::task_local! {
    static ACTIVE_LANGUAGE: String;
}

/// Run `fut` with `language` active.
pub async fn with_language<F>(language: String, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_LANGUAGE.scope(language, fut).await
}

/// The language activated for the current task, if any.
pub fn active_language() -> Option<String> {
    ACTIVE_LANGUAGE.try_with(Clone::clone).ok()
}

/// The active language, or `default` outside any activation scope.
pub fn active_language_or(default: &str) -> String {
    active_language().unwrap_or_else(|| default.to_string())
}
