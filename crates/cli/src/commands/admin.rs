//! Admin account management commands.
//!
//! Passwords are hashed with argon2 before they reach the database. The
//! login page only ever compares against these hashes.

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use thiserror::Error;

use support_desk_web::db::{AdminUserRepository, RepositoryError};
use support_desk_web::models::AdminUser;
use support_desk_web::services::AuthError;
use support_desk_web::services::auth::AdminService;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Username or password rejected, or the account already exists.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No admin has this username.
    #[error("No admin with username: {0}")]
    UnknownUser(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Create a new admin account.
///
/// # Errors
///
/// Returns `AdminError::Auth` if validation fails or the username is taken.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password: &SecretString,
) -> Result<AdminUser, AdminError> {
    let admin = AdminService::new(pool)
        .create_admin(username, password.expose_secret())
        .await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );
    Ok(admin)
}

/// Replace an admin's password.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if the username does not exist.
pub async fn set_password(
    pool: &SqlitePool,
    username: &str,
    password: &SecretString,
) -> Result<(), AdminError> {
    AdminService::new(pool)
        .set_password(username, password.expose_secret())
        .await
        .map_err(|e| match e {
            AuthError::Repository(RepositoryError::NotFound) => {
                AdminError::UnknownUser(username.to_owned())
            }
            other => AdminError::Auth(other),
        })?;

    tracing::info!("Password updated for {}", username);
    Ok(())
}

/// Print every admin account.
///
/// # Errors
///
/// Returns `AdminError::Database` if the query fails.
pub async fn list(pool: &SqlitePool) -> Result<(), AdminError> {
    let admins = AdminUserRepository::new(pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        if admins.is_empty() {
            println!("No admin accounts.");
        }
        for line in admins.iter().map(format_admin) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Delete an admin account.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if the username does not exist.
pub async fn delete(pool: &SqlitePool, username: &str) -> Result<(), AdminError> {
    AdminUserRepository::new(pool)
        .delete(username.trim())
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UnknownUser(username.to_owned()),
            other => AdminError::Database(other),
        })?;

    tracing::info!("Admin {} deleted", username);
    Ok(())
}

fn format_admin(admin: &AdminUser) -> String {
    format!(
        "{:>4}  {:<24}  created {}",
        admin.id.as_i64(),
        admin.username,
        admin.created_at.format("%Y-%m-%d %H:%M")
    )
}
