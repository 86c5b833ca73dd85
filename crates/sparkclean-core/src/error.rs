use thiserror::Error;

/// Top-level error type for SparkClean.
#[derive(Debug, Error)]
pub enum SparkError {
    /// Malformed or missing input from an API caller.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or unusable credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Error from the hosted auth/database backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// Error from the AI suggestion service.
    #[error("ai error: {0}")]
    Ai(String),

    /// Audit log error.
    #[error("audit error: {0}")]
    Audit(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
