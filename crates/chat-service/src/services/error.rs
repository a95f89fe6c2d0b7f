//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use chat_core::{DomainError, RemoteError};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Remote authority failure, delivered unchanged to every coalesced caller
    Remote(RemoteError),

    /// Validation error
    Validation(String),

    /// The manager is shutting down or has stopped
    Shutdown,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Remote(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Shutdown => write!(f, "Manager is shut down"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    pub fn is_validation(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_validation(),
            Self::Validation(_) => true,
            _ => false,
        }
    }

    /// The remote failure behind this error, if any
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(e) | Self::Domain(DomainError::Remote(e)) => Some(e),
            _ => None,
        }
    }

    /// Get the error code for client responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Remote(e) if e.is_aborted() => "REQUEST_ABORTED",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Shutdown => "SHUTDOWN",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Remote(e) => Self::Remote(e),
            other => Self::Domain(other),
        }
    }
}

impl From<RemoteError> for ServiceError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
