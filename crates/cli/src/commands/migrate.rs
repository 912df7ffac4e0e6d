//! Database migration command.
//!
//! Applies the versioned migrations from `crates/web/migrations/` and creates
//! the session table. The server runs the same step at startup; this command
//! exists for deploys that migrate ahead of the rollout.

use sqlx::SqlitePool;
use support_desk_web::db::{self, MigrationError};

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if any migration fails.
pub async fn run(pool: &SqlitePool) -> Result<(), MigrationError> {
    tracing::info!("Running migrations...");
    db::migrate(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
