//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session cookie
//! is signed with a key derived from the configured session secret.
//!
//! Every visitor who renders a form gets a stored session, so expired rows
//! are purged by a background task started with [`spawn_expired_cleanup`].

use sha2::{Digest, Sha512};
use tokio::task::JoinHandle;
use tower_sessions::cookie::{Key, SameSite, time::Duration};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::DeskConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "desk_session";

/// How often expired sessions are deleted.
pub const EXPIRED_CLEANUP_PERIOD: std::time::Duration = std::time::Duration::from_secs(60);

/// Create the session layer over `store`.
///
/// The `tower_sessions` table is created by [`crate::db::migrate`].
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &DeskConfig,
) -> SessionManagerLayer<SqliteStore, SignedCookie> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_ttl_hours)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config.session_secret_bytes()))
}

/// Start deleting expired sessions every [`EXPIRED_CLEANUP_PERIOD`].
///
/// The task runs until aborted or until the store fails; a failure is logged.
pub fn spawn_expired_cleanup(store: SqliteStore) -> JoinHandle<()> {
    tokio::task::spawn(async move {
        if let Err(e) = store
            .continuously_delete_expired(EXPIRED_CLEANUP_PERIOD)
            .await
        {
            tracing::error!(error = %e, "Expired session cleanup stopped");
        }
    })
}

/// Derive the 64-byte cookie signing key from the session secret.
fn signing_key(secret: &[u8]) -> Key {
    let digest = Sha512::digest(secret);
    Key::from(digest.as_slice())
}
