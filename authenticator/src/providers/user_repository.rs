//! User repository: reads and writes the authenticator's own `users` table.

use crate::error::{AuthenticatorError, Result};
use crate::state::UserId;

use super::UserRecord;

/// Abstracts over the `users` table (Postgres in production, in-memory for
/// tests).
pub trait UserRepository: Send + Sync {
    /// Fetch a user by email.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UserNotFound` if no row matches.
    async fn get_by_email(&self, email: &str) -> Result<UserRecord>;

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UserNotFound` if no row matches.
    async fn get_by_id(&self, user_id: UserId) -> Result<UserRecord>;

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::EmailExists` if the email is already
    /// registered, `AuthenticatorError::Internal` on a lower-level failure.
    async fn create(&self, user: UserRecord) -> Result<UserRecord>;

    /// Overwrite the stored password verifier.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UserNotFound` if the user does not
    /// exist.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<()>;

    /// Delete a user row.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::UserNotFound` if the user does not
    /// exist.
    async fn delete(&self, user_id: UserId) -> Result<()>;

    /// Whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Internal` on a database failure.
    async fn email_exists(&self, email: &str) -> Result<bool>;
}

/// Postgres-backed `UserRepository`.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: sqlx::PgPool,
}

impl PostgresUserRepository {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    async fn get_by_email(&self, email: &str) -> Result<UserRecord> {
        sqlx::query_as::<_, PgUserRow>(
            "SELECT user_id, email, password_hash, srp_salt, srp_verifier, created_at, role \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))?
        .map(Into::into)
        .ok_or(AuthenticatorError::UserNotFound)
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<UserRecord> {
        sqlx::query_as::<_, PgUserRow>(
            "SELECT user_id, email, password_hash, srp_salt, srp_verifier, created_at, role \
             FROM users WHERE user_id = $1",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))?
        .map(Into::into)
        .ok_or(AuthenticatorError::UserNotFound)
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord> {
        if self.email_exists(&user.email).await? {
            return Err(AuthenticatorError::EmailExists);
        }

        let role = role_to_str(user.role);
        sqlx::query(
            "INSERT INTO users (user_id, email, password_hash, srp_salt, srp_verifier, created_at, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.user_id.0)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.srp_salt)
        .bind(&user.srp_verifier)
        .bind(user.created_at)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;

        Ok(user)
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE user_id = $2")
            .bind(password_hash)
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthenticatorError::UserNotFound);
        }
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthenticatorError::UserNotFound);
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthenticatorError::Internal(e.to_string()))?;
        Ok(row.0)
    }
}

#[derive(sqlx::FromRow)]
struct PgUserRow {
    user_id: uuid::Uuid,
    email: String,
    password_hash: String,
    srp_salt: Option<Vec<u8>>,
    srp_verifier: Option<Vec<u8>>,
    created_at: chrono::DateTime<chrono::Utc>,
    role: String,
}

impl From<PgUserRow> for UserRecord {
    fn from(row: PgUserRow) -> Self {
        Self {
            user_id: UserId(row.user_id),
            email: row.email,
            password_hash: row.password_hash,
            srp_salt: row.srp_salt,
            srp_verifier: row.srp_verifier,
            created_at: row.created_at,
            role: str_to_role(&row.role),
        }
    }
}

fn role_to_str(role: crate::state::Role) -> &'static str {
    match role {
        crate::state::Role::User => "user",
        crate::state::Role::Admin => "admin",
    }
}

fn str_to_role(s: &str) -> crate::state::Role {
    match s {
        "admin" => crate::state::Role::Admin,
        _ => crate::state::Role::User,
    }
}
