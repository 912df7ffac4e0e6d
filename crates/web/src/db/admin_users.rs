//! Admin user repository.
//!
//! Stores admin usernames and their argon2 password hashes.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use support_desk_core::AdminUserId;

use super::RepositoryError;
use crate::models::AdminUser;

/// Database row for admin user.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        Self {
            id: AdminUserId::new(row.id),
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Database row carrying the password hash, used only for verification.
#[derive(Debug, sqlx::FromRow)]
struct AdminCredentialRow {
    id: i64,
    username: String,
    created_at: DateTime<Utc>,
    password_hash: String,
}

/// Repository for admin user database operations.
pub struct AdminUserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an admin with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            INSERT INTO admin_user (username, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get an admin together with their stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminCredentialRow>(
            r"
            SELECT id, username, created_at, password_hash
            FROM admin_user
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            let user = AdminUser {
                id: AdminUserId::new(r.id),
                username: r.username,
                created_at: r.created_at,
            };
            (user, r.password_hash)
        }))
    }

    /// Get an admin by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, username, created_at
            FROM admin_user
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all admins ordered by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, username, created_at
            FROM admin_user
            ORDER BY username
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace an admin's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the username does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_password_hash(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET password_hash = ? WHERE username = ?")
            .bind(password_hash)
            .bind(username)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an admin by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the username does not exist.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, username: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_user WHERE username = ?")
            .bind(username)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::migrate(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_and_fetch_hash() {
        let pool = pool().await;
        let repo = AdminUserRepository::new(&pool);

        let created = repo.create("admin", "$argon2id$fake").await.unwrap();
        let (user, hash) = repo.get_with_password_hash("admin").await.unwrap().unwrap();

        assert_eq!(user.id, created.id);
        assert_eq!(user.username, "admin");
        assert_eq!(hash, "$argon2id$fake");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = pool().await;
        let repo = AdminUserRepository::new(&pool);

        repo.create("admin", "h1").await.unwrap();
        let err = repo.create("admin", "h2").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_set_password_hash() {
        let pool = pool().await;
        let repo = AdminUserRepository::new(&pool);
        repo.create("admin", "old").await.unwrap();

        repo.set_password_hash("admin", "new").await.unwrap();

        let (_, hash) = repo.get_with_password_hash("admin").await.unwrap().unwrap();
        assert_eq!(hash, "new");
        assert!(matches!(
            repo.set_password_hash("nobody", "x").await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let pool = pool().await;
        let repo = AdminUserRepository::new(&pool);
        repo.create("zuzana", "h").await.unwrap();
        repo.create("adam", "h").await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["adam", "zuzana"]);

        repo.delete("adam").await.unwrap();
        assert!(repo.get_by_username("adam").await.unwrap().is_none());
        assert!(matches!(repo.delete("adam").await, Err(RepositoryError::NotFound)));
    }
}
