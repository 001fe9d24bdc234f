use serde::Deserialize;

use crate::error::AuthError;

/// Argon2id cost parameters embedded in every hash this crate produces.
///
/// Passed explicitly into [`crate::auth::AuthService`] so tests can inject
/// cheap parameters instead of the production costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashParams {
    pub time_cost: u32,       // iterations
    pub memory_cost_kib: u32, // memory in KiB
    pub parallelism: u32,     // lanes
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            time_cost: 3,
            memory_cost_kib: 64_000,
            parallelism: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub hash: HashParams,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AuthError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AuthError::Config("DATABASE_URL not set".into()))?;
        let defaults = HashParams::default();
        let hash = HashParams {
            time_cost: std::env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.time_cost),
            memory_cost_kib: std::env::var("ARGON2_MEMORY_KIB")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.memory_cost_kib),
            parallelism: std::env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.parallelism),
        };
        Ok(Self { database_url, hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_production_costs() {
        let params = HashParams::default();
        assert_eq!(params.time_cost, 3);
        assert_eq!(params.memory_cost_kib, 64_000);
        assert_eq!(params.parallelism, 2);
    }
}
