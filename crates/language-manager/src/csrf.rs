//! CSRF token generation and verification for the language switch form.

use anyhow::{Result, bail};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tower_sessions::Session;

/// Session key for storing CSRF tokens.
const CSRF_SESSION_KEY: &str = "csrf_tokens";

/// Maximum number of tokens to store per session.
const MAX_TOKENS: usize = 10;

/// Token validity period in seconds (1 hour).
const TOKEN_VALIDITY_SECS: i64 = 3600;

/// Generate a CSRF token and store it in the session.
pub async fn generate_csrf_token(session: &Session) -> Result<String> {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);

    let timestamp = chrono::Utc::now().timestamp();

    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.update(timestamp.to_le_bytes());
    let token = hex::encode(hasher.finalize());

    let mut tokens = stored_tokens(session).await;
    tokens.push(format!("{token}:{timestamp}"));

    // Keep only the MAX_TOKENS most recent
    if tokens.len() > MAX_TOKENS {
        let skip = tokens.len() - MAX_TOKENS;
        tokens.drain(..skip);
    }

    session
        .insert(CSRF_SESSION_KEY, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to store CSRF token: {e}"))?;

    Ok(token)
}

/// Verify a CSRF token against the session.
///
/// Tokens are single-use and time-limited. An empty submission is an error;
/// an unknown or expired token is `Ok(false)`.
pub async fn verify_csrf_token(session: &Session, submitted: &str) -> Result<bool> {
    if submitted.is_empty() {
        bail!("empty CSRF token");
    }

    let mut tokens = stored_tokens(session).await;
    if tokens.is_empty() {
        return Ok(false);
    }

    let now = chrono::Utc::now().timestamp();

    let found = tokens.iter().position(|token_data| {
        parse_token(token_data)
            .is_some_and(|(token, ts)| token == submitted && now - ts <= TOKEN_VALIDITY_SECS)
    });

    let Some(index) = found else {
        return Ok(false);
    };

    tokens.remove(index);
    tokens.retain(|token_data| {
        parse_token(token_data).is_some_and(|(_, ts)| now - ts <= TOKEN_VALIDITY_SECS)
    });

    session
        .insert(CSRF_SESSION_KEY, tokens)
        .await
        .map_err(|e| anyhow::anyhow!("failed to update CSRF tokens: {e}"))?;

    Ok(true)
}

async fn stored_tokens(session: &Session) -> Vec<String> {
    session
        .get(CSRF_SESSION_KEY)
        .await
        .unwrap_or(None)
        .unwrap_or_default()
}

fn parse_token(token_data: &str) -> Option<(&str, i64)> {
    let (token, timestamp) = token_data.split_once(':')?;
    Some((token, timestamp.parse().ok()?))
}
