//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::DeskConfig;
use crate::services::{CredentialVerifier, DatabaseVerifier};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DeskConfig,
    pool: SqlitePool,
    session_store: SqliteStore,
    verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Create application state with the database-backed credential verifier.
    #[must_use]
    pub fn new(config: DeskConfig, pool: SqlitePool) -> Self {
        let verifier = Arc::new(DatabaseVerifier::new(pool.clone()));
        Self::with_verifier(config, pool, verifier)
    }

    /// Create application state with an explicit credential verifier.
    #[must_use]
    pub fn with_verifier(
        config: DeskConfig,
        pool: SqlitePool,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                session_store: SqliteStore::new(pool.clone()),
                pool,
                verifier,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &DeskConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get the session store shared by the session layer and the expiry task.
    #[must_use]
    pub fn session_store(&self) -> &SqliteStore {
        &self.inner.session_store
    }

    /// Get the credential verifier used by the login route.
    #[must_use]
    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.inner.verifier.as_ref()
    }
}
