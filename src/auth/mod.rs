pub mod password;
pub mod repo;
mod repo_types;
pub mod services;

pub use repo_types::User;
pub use services::{AuthService, VerifyOutcome};
