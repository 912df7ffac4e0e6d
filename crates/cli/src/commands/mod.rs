//! Subcommand implementations.

pub mod admin;
pub mod migrate;

use sqlx::SqlitePool;
use support_desk_web::config::DeskConfig;
use support_desk_web::db;

/// Open the configured database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the database cannot be opened.
pub async fn connect() -> Result<SqlitePool, sqlx::Error> {
    let database_url = DeskConfig::database_url_from_env();
    tracing::info!("Connecting to database...");
    db::create_pool(&database_url).await
}
