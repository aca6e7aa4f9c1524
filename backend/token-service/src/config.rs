//! Configuration management for Token Service
//!
//! Loads settings from environment variables, with a `.env` file for local
//! development. Secrets (JWT signing key, SMTP credentials) have no
//! defaults and must be provided explicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub token: TokenSettings,
    pub alert: AlertSettings,
}

impl Settings {
    /// Load settings from environment variables (and `.env` in development)
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            server: ServerSettings::from_env()?,
            database: DatabaseSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            token: TokenSettings::from_env()?,
            alert: AlertSettings::from_env()?,
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SERVER_PORT")?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pool connection, in seconds. Storage
    /// calls must never block indefinitely; exceeding this surfaces as a
    /// retryable internal error, not a credential rejection.
    pub acquire_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
        })
    }
}

/// Access-token signing settings
///
/// The signing key is injected into the codec at construction; there is no
/// process-wide key singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    pub secret: String,
    /// Access-token lifetime in seconds
    pub expiry_seconds: i64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            expiry_seconds: env::var("JWT_EXPIRY_SECONDS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("Invalid JWT_EXPIRY_SECONDS")?,
        })
    }
}

/// Refresh-token lifecycle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// bcrypt work factor for refresh-token hashes
    pub bcrypt_cost: u32,
    /// Records older than this are invisible to lookups and purged
    pub refresh_ttl_days: i64,
    /// Interval between purge runs, in seconds
    pub purge_interval_seconds: u64,
}

impl TokenSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            bcrypt_cost: env::var("REFRESH_TOKEN_BCRYPT_COST")
                .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
                .parse()
                .context("Invalid REFRESH_TOKEN_BCRYPT_COST")?,
            refresh_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid REFRESH_TOKEN_TTL_DAYS")?,
            purge_interval_seconds: env::var("REFRESH_TOKEN_PURGE_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("Invalid REFRESH_TOKEN_PURGE_INTERVAL_SECONDS")?,
        })
    }
}

/// Anomaly alert delivery configuration (SMTP)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub security_team_address: String,
}

impl AlertSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("Invalid SMTP_PORT")?,
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM")
                .unwrap_or_else(|_| "noreply@tokenrot.dev".to_string()),
            security_team_address: env::var("ALERT_SECURITY_ADDRESS")
                .unwrap_or_else(|_| "security@tokenrot.dev".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_settings_defaults() {
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");

        let settings = ServerSettings::from_env().unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_jwt_settings_from_env() {
        env::set_var("JWT_SECRET", "test-secret-key");
        env::set_var("JWT_EXPIRY_SECONDS", "300");

        let settings = JwtSettings::from_env().unwrap();

        assert_eq!(settings.secret, "test-secret-key");
        assert_eq!(settings.expiry_seconds, 300);

        env::remove_var("JWT_SECRET");
        env::remove_var("JWT_EXPIRY_SECONDS");
    }

    #[test]
    fn test_token_settings_defaults() {
        env::remove_var("REFRESH_TOKEN_BCRYPT_COST");
        env::remove_var("REFRESH_TOKEN_TTL_DAYS");

        let settings = TokenSettings::from_env().unwrap();

        assert_eq!(settings.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(settings.refresh_ttl_days, 30);
        assert_eq!(settings.purge_interval_seconds, 3600);
    }

    #[test]
    fn test_database_settings_require_url() {
        env::remove_var("DATABASE_URL");
        assert!(DatabaseSettings::from_env().is_err());

        env::set_var("DATABASE_URL", "postgres://localhost/tokens");
        let settings = DatabaseSettings::from_env().unwrap();
        assert_eq!(settings.acquire_timeout, 5); // Default

        env::remove_var("DATABASE_URL");
    }
}
