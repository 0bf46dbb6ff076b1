//! Error types for tubetool.

use thiserror::Error;

/// Primary error type for all tubetool operations.
#[derive(Error, Debug)]
pub enum TubetoolError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Task submission response carried no task id")]
    MissingTaskId,

    #[error("Task failed: {status} — {detail}")]
    TaskFailed { status: String, detail: String },

    #[error("Task did not complete within {attempts} poll attempts")]
    TaskTimeout { attempts: u32 },

    #[error("Task {task_id} reported completion but no result payload was found")]
    TaskCompletedWithoutResult { task_id: String },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TubetoolError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) | Self::TaskTimeout { .. } => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::TaskFailed { .. } | Self::TaskCompletedWithoutResult { .. } => {
                ErrorCategory::Task
            }
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Terminal task outcomes (`TaskFailed`, `TaskCompletedWithoutResult`)
    /// are never retryable: the provider has already given its answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Server
        )
    }
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    Task,
    Unknown,
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TubetoolError>;
