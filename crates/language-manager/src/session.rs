//! Session layer and the session-persisted language.

use anyhow::{Context, Result};
use fred::prelude::*;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};
use tower_sessions_redis_store::RedisStore;

/// Session key holding the chosen language.
pub const SESSION_LANGUAGE: &str = "_language";

/// Default session expiry (24 hours).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Wrap a store in a session layer with the standard cookie hardening.
pub fn session_layer<S: SessionStore>(
    store: S,
    secure: bool,
    same_site: SameSite,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(same_site)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            DEFAULT_SESSION_EXPIRY_HOURS,
        )))
}

/// Connect to Redis and build a Redis-backed session store.
pub async fn create_redis_store(redis_url: &str) -> Result<RedisStore<Pool>> {
    let config = Config::from_url(redis_url).context("failed to parse Redis URL")?;

    let pool = Builder::from_config(config)
        .build_pool(1)
        .context("failed to create Redis pool")?;

    pool.init()
        .await
        .context("failed to connect to Redis for sessions")?;

    Ok(RedisStore::new(pool))
}

/// Language stored in the session, if any.
pub async fn session_language(session: &Session) -> Option<String> {
    match session.get::<String>(SESSION_LANGUAGE).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read session language");
            None
        }
    }
}

/// Persist the chosen language in the session.
pub async fn store_session_language(session: &Session, language: &str) -> Result<()> {
    session
        .insert(SESSION_LANGUAGE, language)
        .await
        .map_err(|e| anyhow::anyhow!("failed to store session language: {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn stored_language_is_read_back() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert_eq!(session_language(&session).await, None);
        store_session_language(&session, "ar").await.unwrap();
        assert_eq!(session_language(&session).await.as_deref(), Some("ar"));
    }
}
