use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,               // surrogate key, assigned by the store
    pub username: String,      // unique login name, indexed
    pub email: String,         // not unique, accounts may share one
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String, // full PHC-encoded Argon2 string, not exposed in JSON
    pub images: String,        // opaque JSON list owned by the media subsystem
    pub points: i64,           // gamification, defaults only
    pub level: i64,            // gamification, defaults only
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            images: "[]".to_string(),
            points: 0,
            level: 1,
        };

        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }
}
