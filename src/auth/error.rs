use thiserror::Error;

use crate::error::TubetoolError;

/// Normalized authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Client secrets unavailable: {0}")]
    Config(String),
    #[error("Token refresh rejected (status {status}): {detail}")]
    RefreshRejected { status: u16, detail: String },
    #[error("Authorization callback carried no code")]
    NoAuthorizationCode,
    #[error("No authorization callback arrived within {0} seconds")]
    AuthorizationTimeout(u64),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for TubetoolError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Config(msg) => TubetoolError::Configuration(msg),
            other => TubetoolError::Authentication(other.to_string()),
        }
    }
}
