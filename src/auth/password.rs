use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::HashParams;
use crate::error::AuthError;

fn argon2_instance(params: &HashParams) -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(
        params.memory_cost_kib,
        params.time_cost,
        params.parallelism,
        None,
    )
    .map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with Argon2id and a fresh random salt.
///
/// Returns the PHC string carrying algorithm id, version, cost parameters,
/// salt and derived key, so later verification needs nothing but the string.
pub fn hash_password(plain: &str, params: &HashParams) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2_instance(params)?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            AuthError::Hashing(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext against a stored PHC string, recomputing with the
/// parameters embedded in the hash.
///
/// `Ok(false)` means wrong password; `Err(CorruptHash)` means the stored
/// string itself is unreadable. Both reject the login, but callers log them
/// differently.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        AuthError::CorruptHash(e.to_string())
    })?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::CorruptHash(e.to_string())),
    }
}

/// Whether the cost parameters embedded in `hash` differ from `current`.
///
/// Pure check, no recomputation.
pub fn needs_rehash(hash: &str, current: &HashParams) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::CorruptHash(e.to_string()))?;
    let embedded = Params::try_from(&parsed).map_err(|e| AuthError::CorruptHash(e.to_string()))?;
    Ok(embedded.t_cost() != current.time_cost
        || embedded.m_cost() != current.memory_cost_kib
        || embedded.p_cost() != current.parallelism)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> HashParams {
        HashParams {
            time_cost: 1,
            memory_cost_kib: 1024,
            parallelism: 1,
        }
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, &cheap_params()).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, &cheap_params()).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_flags_malformed_hash_as_corrupt() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, AuthError::CorruptHash(_)));
    }

    #[test]
    fn same_password_hashes_differently_but_both_verify() {
        let password = "same-password";
        let hash1 = hash_password(password, &cheap_params()).expect("hash 1");
        let hash2 = hash_password(password, &cheap_params()).expect("hash 2");

        // fresh salt per call
        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).expect("verify 1"));
        assert!(verify_password(password, &hash2).expect("verify 2"));
    }

    #[test]
    fn needs_rehash_false_for_current_params() {
        let params = cheap_params();
        let hash = hash_password("pw", &params).expect("hash");
        assert!(!needs_rehash(&hash, &params).expect("needs_rehash"));
    }

    #[test]
    fn needs_rehash_true_when_any_cost_differs() {
        let old = cheap_params();
        let hash = hash_password("pw", &old).expect("hash");

        let mut current = old;
        current.time_cost = 2;
        assert!(needs_rehash(&hash, &current).expect("time cost changed"));

        let mut current = old;
        current.memory_cost_kib = 2048;
        assert!(needs_rehash(&hash, &current).expect("memory cost changed"));

        let mut current = old;
        current.parallelism = 2;
        assert!(needs_rehash(&hash, &current).expect("parallelism changed"));
    }

    #[test]
    fn old_params_hash_still_verifies_under_new_config() {
        let old = cheap_params();
        let hash = hash_password("pw", &old).expect("hash");
        // verification always uses the params embedded in the hash
        assert!(verify_password("pw", &hash).expect("verify"));
    }

    #[test]
    fn needs_rehash_flags_malformed_hash_as_corrupt() {
        let err = needs_rehash("garbage", &cheap_params()).unwrap_err();
        assert!(matches!(err, AuthError::CorruptHash(_)));
    }
}
