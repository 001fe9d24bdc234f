use thiserror::Error;

/// Everything that can go wrong in the credential core.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    #[error("no such user")]
    UserNotFound,

    /// The stored encoded hash could not be parsed. Distinct from a wrong
    /// password so callers can flag data-integrity problems.
    #[error("corrupt password hash record: {0}")]
    CorruptHash(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
