use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::password::{hash_password, needs_rehash, verify_password};
use crate::auth::repo_types::User;
use crate::config::HashParams;
use crate::error::{AuthError, AuthResult};

const USERNAME_MAX: usize = 64;
const EMAIL_MAX: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Outcome of a login attempt against an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub authenticated: bool,
    /// Whether this call transparently upgraded the stored hash.
    pub rehashed: bool,
}

impl VerifyOutcome {
    fn rejected() -> Self {
        Self {
            authenticated: false,
            rehashed: false,
        }
    }
}

/// Account creation and password verification over one shared pool.
///
/// Hash cost parameters are injected at construction, never read from
/// ambient state.
#[derive(Clone)]
pub struct AuthService {
    db: SqlitePool,
    params: HashParams,
}

impl AuthService {
    pub fn new(db: SqlitePool, params: HashParams) -> Self {
        Self { db, params }
    }

    /// Create an account: validate input, hash the password, insert the row.
    ///
    /// A taken username surfaces as [`AuthError::DuplicateUsername`].
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<User> {
        let username = username.trim();
        let email = email.trim().to_lowercase();

        if username.is_empty() {
            return Err(AuthError::validation("username must not be empty"));
        }
        if username.len() > USERNAME_MAX {
            return Err(AuthError::validation("username too long"));
        }
        if email.is_empty() {
            return Err(AuthError::validation("email must not be empty"));
        }
        if email.len() > EMAIL_MAX {
            return Err(AuthError::validation("email too long"));
        }
        if !is_valid_email(&email) {
            warn!(email = %email, "invalid email");
            return Err(AuthError::validation("invalid email address"));
        }
        if password.is_empty() {
            return Err(AuthError::validation("password must not be empty"));
        }

        let hash = hash_password(password, &self.params)?;
        let user = User::create(&self.db, username, &email, &hash).await?;

        info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Check a login attempt and transparently upgrade the stored hash when
    /// its embedded cost parameters are outdated.
    ///
    /// An unknown username is [`AuthError::UserNotFound`]; whether to show
    /// that distinction to an end user is the caller's call. A corrupt
    /// stored hash rejects the login instead of erroring out.
    pub async fn verify_and_maybe_rehash(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<VerifyOutcome> {
        let user = User::find_by_username(&self.db, username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let ok = match verify_password(password, &user.password_hash) {
            Ok(ok) => ok,
            Err(AuthError::CorruptHash(e)) => {
                warn!(user_id = user.id, error = %e, "stored hash unreadable, rejecting login");
                return Ok(VerifyOutcome::rejected());
            }
            Err(e) => return Err(e),
        };

        if !ok {
            return Ok(VerifyOutcome::rejected());
        }

        let mut rehashed = false;
        if needs_rehash(&user.password_hash, &self.params).unwrap_or(false) {
            // Concurrent logins may both reach this point; each writes a
            // hash derived from the same verified plaintext, so the last
            // atomic row update to commit wins and every outcome is valid.
            // The write is best-effort: on failure the stale hash stays put
            // and the next successful login retries the upgrade.
            let new_hash = hash_password(password, &self.params)?;
            match User::update_password_hash(&self.db, user.id, &new_hash).await {
                Ok(()) => {
                    rehashed = true;
                    info!(user_id = user.id, "password hash upgraded to current parameters");
                }
                Err(e) => {
                    warn!(user_id = user.id, error = %e, "rehash write failed, keeping stale hash");
                }
            }
        }

        Ok(VerifyOutcome {
            authenticated: true,
            rehashed,
        })
    }
}
