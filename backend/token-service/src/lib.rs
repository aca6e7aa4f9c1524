/// Token Service Library
///
/// Issues, verifies, and rotates paired authentication credentials: a
/// short-lived signed access token and a long-lived opaque single-use
/// refresh token.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Refresh-token store (trait + PostgreSQL implementation)
/// - `error`: Error types
/// - `handlers`: REST endpoints
/// - `metrics`: Prometheus collectors
/// - `models`: Data models
/// - `security`: Access-token codec, secret generation, token hashing
/// - `services`: Rotation protocol and anomaly alerting
/// - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use db::{PgRefreshTokenStore, RefreshTokenStore};
pub use error::{Result, TokenError};
pub use models::{AccessClaims, RefreshTokenRecord, TokenPairResponse};
pub use security::AccessTokenCodec;
pub use services::{AnomalyNotifier, EmailAlertService, RotationService};
