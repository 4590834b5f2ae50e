//! Error taxonomy for status checks.

use thiserror::Error;

/// Result type alias for status check operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Errors that escape a status check.
///
/// A refused or unreachable probe target is not one of these; it is reported
/// as an `error-connect` status instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// The requested service is not configured.
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    /// The token endpoint answered with an explicit error.
    #[error("{0}")]
    Token(String),

    /// Unexpected I/O, parsing or decryption failure.
    #[error("{0}")]
    HealthCheck(String),
}

impl CheckError {
    /// Build a `HealthCheck` error from any displayable cause.
    pub fn health_check(cause: impl std::fmt::Display) -> Self {
        Self::HealthCheck(cause.to_string())
    }

    /// Label used by the dispatch layer when rendering the error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceNotFound(_) => "ServiceNotFound",
            Self::Token(_) => "TokenError",
            Self::HealthCheck(_) => "HealthCheckError",
        }
    }
}
