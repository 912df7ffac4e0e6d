//! Authentication service.
//!
//! Admin credentials are argon2 hashes in the `admin_user` table. Handlers
//! only see the [`CredentialVerifier`] trait, so the storage behind it can
//! change without touching the login route.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::{AdminUser, CurrentAdmin};

/// Minimum password length for accounts created through the service.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length (matches the column bound).
const MAX_USERNAME_LENGTH: usize = 64;

/// Hash verified against when the username does not exist, so that unknown
/// users cost the same as wrong passwords.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("not-a-real-password").ok());

/// Checks a username/password pair and yields the admin identity.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown user or a wrong
    /// password, and `AuthError::Repository` if storage is unavailable.
    async fn verify(&self, username: &str, password: &str) -> Result<CurrentAdmin, AuthError>;
}

/// [`CredentialVerifier`] backed by the `admin_user` table.
#[derive(Clone)]
pub struct DatabaseVerifier {
    pool: SqlitePool,
}

impl DatabaseVerifier {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialVerifier for DatabaseVerifier {
    async fn verify(&self, username: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let admin = AdminService::new(&self.pool).login(username, password).await?;
        Ok(admin.into())
    }
}

/// Admin account service.
///
/// Handles account creation, password changes and login checks.
pub struct AdminService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminService<'a> {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword` if
    /// validation fails, and `AuthError::UserAlreadyExists` if the username is
    /// taken.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let username = validate_username(username)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Replace an admin's password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short and
    /// `AuthError::Repository` (wrapping `NotFound`) for an unknown username.
    pub async fn set_password(&self, username: &str, password: &str) -> Result<(), AuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;
        self.users
            .set_password_hash(username.trim(), &password_hash)
            .await?;
        Ok(())
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AuthError> {
        let Some((user, password_hash)) = self.users.get_with_password_hash(username).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash a password with argon2 default parameters.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with(&Argon2::default(), password)
}

/// Hash a password with explicit argon2 parameters.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
///
/// The argon2 parameters are read from the hash itself.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Validate password strength.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Validate and trim a username.
///
/// # Errors
///
/// Returns `AuthError::InvalidUsername` if the username is empty, too long,
/// or contains whitespace or control characters.
pub fn validate_username(username: &str) -> Result<&str, AuthError> {
    let username = username.trim();

    if username.is_empty() {
        return Err(AuthError::InvalidUsername("username cannot be empty".to_owned()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuthError::InvalidUsername(
            "username cannot contain whitespace".to_owned(),
        ));
    }

    Ok(username)
}
