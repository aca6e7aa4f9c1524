use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Invalid access token")]
    Unauthorized,

    #[error("Access token expired")]
    TokenExpired,

    #[error("Unexpected signing algorithm")]
    AlgorithmMismatch,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl TokenError {
    fn status(&self) -> StatusCode {
        match self {
            TokenError::InvalidUserId(_) => StatusCode::BAD_REQUEST,
            TokenError::Unauthorized
            | TokenError::TokenExpired
            | TokenError::AlgorithmMismatch
            | TokenError::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            TokenError::Database(_) | TokenError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Internal failures get a generic body so
    /// storage and crypto details never leave the service.
    fn public_message(&self) -> String {
        match self {
            TokenError::Database(_) | TokenError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for TokenError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        }))
    }
}

// Conversions from external error types
impl From<sqlx::Error> for TokenError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        TokenError::Database(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::AlgorithmMismatch
            }
            _ => TokenError::Unauthorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let err = TokenError::InvalidUserId("not-a-guid".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_credential_errors_map_to_401() {
        assert_eq!(TokenError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(TokenError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            TokenError::AlgorithmMismatch.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TokenError::InvalidRefreshToken.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_failures_are_generic() {
        let err = TokenError::Database("connection refused to 10.1.2.3:5432".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
