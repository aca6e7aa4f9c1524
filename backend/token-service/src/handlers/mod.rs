pub mod health;
pub mod tokens;

pub use health::{health_check, readiness_check};
pub use tokens::{issue_tokens, refresh_tokens};
