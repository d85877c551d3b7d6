//! Service layer error types
//!
//! `SyncError` is the per-event failure taxonomy of the processors;
//! `ServiceError` is what ticks and reconciliation runs surface to callers.

use roster_core::{DomainError, GatewayError};
use std::fmt;
use thiserror::Error;

/// Why one outbox event could not be applied
///
/// The `Display` string is what gets persisted as the event's error.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required payload field absent; never retried, no external call made
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// External call failed permanently or exhausted its retries
    #[error("{operation} failed: {source}")]
    Gateway {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// Mapping store failure inside dispatch
    #[error("Mapping store error: {0}")]
    Storage(#[from] DomainError),
}

impl SyncError {
    /// Create a missing field error
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a gateway error for an operation
    pub fn gateway(operation: &'static str, source: GatewayError) -> Self {
        Self::Gateway { operation, source }
    }

    /// Malformed event, as opposed to an external or storage problem
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// Failure class used as a structured log field
    pub fn failure_class(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "data_integrity",
            Self::Gateway { .. } => "external",
            Self::Storage(_) => "storage",
        }
    }
}

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Storage or domain failure
    Domain(DomainError),

    /// Validation error
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get the error code for logs and reports
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
