use sqlx::SqlitePool;
use tracing::debug;

use crate::auth::repo_types::User;
use crate::error::AuthError;

impl User {
    /// Insert a new user row. The schema fills `images`, `points` and
    /// `level` with their defaults; the row either lands complete or not at
    /// all.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        if email.is_empty() {
            return Err(AuthError::validation("email must not be empty"));
        }
        if password_hash.is_empty() {
            return Err(AuthError::validation("password hash must not be empty"));
        }

        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO auth (username, email, password)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, email, password, images, points, level
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find a user by username. Hits the unique index on `username`.
    pub async fn find_by_username(
        db: &SqlitePool,
        username: &str,
    ) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, images, points, level
            FROM auth
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Overwrite only the stored password hash.
    ///
    /// A single atomic statement; concurrent calls for the same id may race
    /// and the last commit wins, which is fine as long as every written hash
    /// is valid for the account's password.
    pub async fn update_password_hash(
        db: &SqlitePool,
        id: i64,
        new_hash: &str,
    ) -> Result<(), AuthError> {
        let affected = sqlx::query("UPDATE auth SET password = ?1 WHERE id = ?2")
            .bind(new_hash)
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AuthError::UserNotFound);
        }
        debug!(user_id = id, "password hash updated");
        Ok(())
    }
}
