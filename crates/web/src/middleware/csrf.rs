//! Per-session CSRF tokens.
//!
//! A random token is stored in the session the first time a form is
//! rendered. Every state-changing POST must echo it back in a hidden
//! `csrf_token` field.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Generate a fresh 256-bit token.
fn generate() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Return the session's token, creating one if the session has none.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn token(session: &Session) -> Result<String, AppError> {
    if let Some(existing) = session.get::<String>(session_keys::CSRF_TOKEN).await? {
        return Ok(existing);
    }

    let token = generate();
    session.insert(session_keys::CSRF_TOKEN, &token).await?;
    Ok(token)
}

/// Check a submitted token against the session's token.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the session has no token or the tokens
/// differ, and `AppError::Session` if the session store fails.
pub async fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    let expected: Option<String> = session.get(session_keys::CSRF_TOKEN).await?;

    match expected {
        Some(expected) if tokens_match(expected.as_bytes(), submitted.as_bytes()) => Ok(()),
        _ => {
            tracing::warn!("Rejected form post with invalid CSRF token");
            Err(AppError::Forbidden("invalid form token".to_owned()))
        }
    }
}

/// Length-checked comparison that does not short-circuit on the first
/// differing byte.
fn tokens_match(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_generated_tokens_differ() {
        let a = generate();
        let b = generate();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match(b"abc", b"abc"));
        assert!(!tokens_match(b"abc", b"abd"));
        assert!(!tokens_match(b"abc", b"ab"));
        assert!(!tokens_match(b"", b""));
    }

    #[tokio::test]
    async fn test_token_is_stable_within_session() {
        let session = session();
        let first = token(&session).await.unwrap();
        let second = token(&session).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_verify() {
        let session = session();
        let issued = token(&session).await.unwrap();

        assert!(verify(&session, &issued).await.is_ok());
        assert!(matches!(
            verify(&session, "forged").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_without_issued_token() {
        let session = session();
        assert!(matches!(
            verify(&session, "").await,
            Err(AppError::Forbidden(_))
        ));
    }
}
